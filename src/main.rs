use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tourbook::config::AppConfig;
use tourbook::db;
use tourbook::handlers;
use tourbook::models::HomeCatalog;
use tourbook::services::geocoding::nominatim::NominatimGeocoder;
use tourbook::services::messaging::console::ConsoleMailer;
use tourbook::services::messaging::sendgrid::SendGridMailer;
use tourbook::services::messaging::Mailer;
use tourbook::services::notification::Notifier;
use tourbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let email_timeout = Duration::from_secs(config.email_timeout_secs);
    let mailer: Arc<dyn Mailer> = if config.sendgrid_api_key.is_empty() {
        tracing::warn!("SENDGRID_API_KEY not set, confirmation emails will only be logged");
        Arc::new(ConsoleMailer)
    } else {
        tracing::info!("using SendGrid mailer (from: {})", config.default_from_email);
        Arc::new(SendGridMailer::new(
            config.sendgrid_api_key.clone(),
            config.default_from_email.clone(),
            config.business_name.clone(),
            email_timeout,
        )?)
    };
    tracing::info!("email dispatch mode: {:?}", config.email_dispatch);
    let notifier = Notifier::from_mode(&config.email_dispatch, mailer, email_timeout);

    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.clone(),
        config.geocoder_country.clone(),
        &config.geocoder_user_agent,
        Duration::from_secs(config.geocoder_timeout_secs),
    )?;

    let cors = cors_layer(&config)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        catalog: HomeCatalog::bellavista(),
        geocoder: Box::new(geocoder),
        notifier,
    });

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &AppConfig) -> anyhow::Result<CorsLayer> {
    if config.cors_allow_all_origins {
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {o}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
