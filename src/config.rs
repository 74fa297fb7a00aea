use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchMode {
    /// Wait for the mailer before answering the request.
    Sync,
    /// Hand the email to the background worker and answer immediately.
    Background,
}

impl DispatchMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sync" => DispatchMode::Sync,
            _ => DispatchMode::Background,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub business_name: String,
    pub default_from_email: String,
    pub sendgrid_api_key: String,
    pub email_dispatch: DispatchMode,
    pub email_timeout_secs: u64,
    pub geocoder_url: String,
    pub geocoder_country: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub cors_allow_all_origins: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "tourbook.db".to_string()),
            business_name: env::var("BUSINESS_NAME")
                .unwrap_or_else(|_| "Bellavista Care Homes".to_string()),
            default_from_email: env::var("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@bellavista.com".to_string()),
            sendgrid_api_key: env::var("SENDGRID_API_KEY").unwrap_or_default(),
            email_dispatch: DispatchMode::parse(
                &env::var("EMAIL_DISPATCH").unwrap_or_default(),
            ),
            email_timeout_secs: env::var("EMAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),
            geocoder_country: env::var("GEOCODER_COUNTRY").unwrap_or_else(|_| "gb".to_string()),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| "BellavistaCareHomes/1.0".to_string()),
            geocoder_timeout_secs: env::var("GEOCODER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            cors_allow_all_origins: env::var("CORS_ALLOW_ALL_ORIGINS")
                .map(|v| parse_bool(&v))
                .unwrap_or(true),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        }
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_mode_parse() {
        assert_eq!(DispatchMode::parse("sync"), DispatchMode::Sync);
        assert_eq!(DispatchMode::parse(" SYNC "), DispatchMode::Sync);
        assert_eq!(DispatchMode::parse("background"), DispatchMode::Background);
        assert_eq!(DispatchMode::parse(""), DispatchMode::Background);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("True"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://localhost:3000, https://bellavista.example ,,"),
            ["http://localhost:3000", "https://bellavista.example"]
        );
        assert!(split_list("").is_empty());
    }
}
