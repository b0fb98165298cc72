use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::config;

use super::{Alert, AlertError, Notifier};

/// Email delivery over authenticated implicit-TLS SMTP.
///
/// Opens one session per send and drops it afterwards; there is no
/// connection reuse across alerts.
pub struct SmtpNotifier {
    config: config::Smtp,
}

impl SmtpNotifier {
    pub fn new(config: config::Smtp) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, AlertError> {
        // TLS from the first byte (SMTPS), not STARTTLS.
        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());

        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
            .port(self.config.port)
            .credentials(credentials)
            .build())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), AlertError> {
        let message = Message::builder()
            .from(self.config.sender.parse::<Mailbox>()?)
            .to(self.config.recipient.parse::<Mailbox>()?)
            .subject(alert.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())?;

        self.transport()?.send(message).await?;
        debug!("Alert mailed to {}: {}", self.config.recipient, alert.subject);

        Ok(())
    }
}
