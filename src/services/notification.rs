use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::DispatchMode;
use crate::models::{Booking, HomeCatalog};
use crate::services::messaging::{EmailMessage, Mailer};

pub fn compose_confirmation(
    booking: &Booking,
    catalog: &HomeCatalog,
    business_name: &str,
) -> EmailMessage {
    let notes = booking
        .notes
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("None");

    let body = format!(
        "Dear {first_name},\n\
         \n\
         Thank you for booking a tour with {business_name}!\n\
         \n\
         Booking Details:\n\
         - Booking ID: #{id}\n\
         - Name: {full_name}\n\
         - Location: {location}\n\
         - Date: {date}\n\
         - Time: {time}\n\
         - Phone: {phone}\n\
         - Notes: {notes}\n\
         \n\
         We will contact you within 24 hours to confirm your tour details.\n\
         \n\
         Best regards,\n\
         {business_name} Team\n",
        first_name = booking.first_name,
        id = booking.id,
        full_name = booking.full_name(),
        location = catalog.label(booking.preferred_home),
        date = booking.preferred_date.format("%B %d, %Y"),
        time = booking.preferred_time.format("%H:%M"),
        phone = booking.phone_number,
    );

    EmailMessage {
        to: booking.email.clone(),
        subject: format!("Tour Booking Confirmation - #{}", booking.id),
        body,
    }
}

/// Delivers booking confirmations. Delivery is best-effort and at most once:
/// failures are logged and never retried or reported to the caller. Each send
/// is abandoned after `send_timeout`.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
    queue: Option<mpsc::UnboundedSender<EmailMessage>>,
}

impl Notifier {
    /// Sends inline; `dispatch` reports whether the mailer accepted the email.
    pub fn sync(mailer: Arc<dyn Mailer>, send_timeout: Duration) -> Self {
        Self {
            mailer,
            send_timeout,
            queue: None,
        }
    }

    /// Spawns a worker that drains a queue of emails. Must be called inside a
    /// tokio runtime. `dispatch` always reports an attempt.
    pub fn background(mailer: Arc<dyn Mailer>, send_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(Arc::clone(&mailer), send_timeout, rx));
        Self {
            mailer,
            send_timeout,
            queue: Some(tx),
        }
    }

    pub fn from_mode(mode: &DispatchMode, mailer: Arc<dyn Mailer>, send_timeout: Duration) -> Self {
        match mode {
            DispatchMode::Sync => Self::sync(mailer, send_timeout),
            DispatchMode::Background => Self::background(mailer, send_timeout),
        }
    }

    pub async fn dispatch(&self, message: EmailMessage) -> bool {
        match &self.queue {
            Some(queue) => {
                if let Err(e) = queue.send(message) {
                    tracing::error!(to = %e.0.to, "notification worker stopped, email dropped");
                }
                true
            }
            None => deliver(self.mailer.as_ref(), self.send_timeout, &message).await,
        }
    }
}

async fn run_worker(
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
    mut rx: mpsc::UnboundedReceiver<EmailMessage>,
) {
    while let Some(message) = rx.recv().await {
        deliver(mailer.as_ref(), send_timeout, &message).await;
    }
    tracing::debug!("notification worker exiting");
}

async fn deliver(mailer: &dyn Mailer, send_timeout: Duration, message: &EmailMessage) -> bool {
    match tokio::time::timeout(send_timeout, mailer.send_email(message)).await {
        Ok(Ok(())) => {
            tracing::info!(to = %message.to, subject = %message.subject, "confirmation email sent");
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, to = %message.to, "failed to send confirmation email");
            false
        }
        Err(_) => {
            tracing::error!(
                to = %message.to,
                timeout_secs = send_timeout.as_secs_f64(),
                "confirmation email timed out"
            );
            false
        }
    }
}
