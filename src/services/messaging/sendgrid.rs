use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{EmailMessage, Mailer};

const SENDGRID_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridMailer {
    api_key: String,
    from_email: String,
    from_name: String,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(
        api_key: String,
        from_email: String,
        from_name: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build SendGrid HTTP client")?;

        Ok(Self {
            api_key,
            from_email,
            from_name,
            client,
        })
    }

    fn payload(&self, message: &EmailMessage) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": self.from_email, "name": self.from_name },
            "subject": message.subject,
            "content": [{ "type": "text/plain", "value": message.body }],
        })
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send_email(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.client
            .post(SENDGRID_URL)
            .bearer_auth(&self.api_key)
            .json(&self.payload(message))
            .send()
            .await
            .context("failed to send SendGrid email")?
            .error_for_status()
            .context("SendGrid API returned error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let mailer = SendGridMailer::new(
            "key".to_string(),
            "noreply@bellavista.com".to_string(),
            "Bellavista Care Homes".to_string(),
            Duration::from_secs(10),
        )
        .unwrap();
        let payload = mailer.payload(&EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Hello".to_string(),
            body: "Body".to_string(),
        });

        assert_eq!(payload["personalizations"][0]["to"][0]["email"], "alice@example.com");
        assert_eq!(payload["from"]["email"], "noreply@bellavista.com");
        assert_eq!(payload["subject"], "Hello");
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][0]["value"], "Body");
    }
}
