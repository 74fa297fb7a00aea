use async_trait::async_trait;

use super::{EmailMessage, Mailer};

/// Writes emails to the log instead of sending them. Used when no email
/// provider is configured.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send_email(&self, message: &EmailMessage) -> anyhow::Result<()> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "email provider not configured, logging email instead\n{}",
            message.body
        );
        Ok(())
    }
}
