pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

pub use smtp::SmtpNotifier;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// One outbound notification: a subject/body pair for the fixed recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}

impl Alert {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self { subject: subject.into(), body: body.into() }
    }

    /// Alert for a probe that did not come back with its expected status.
    pub fn service_check_failed(url: &str, expected_status: u16) -> Self {
        Self::new(
            format!("Service Alert: {url} - Failed Test for HTTP {expected_status}"),
            format!(
                "The service at {url} did not return the expected HTTP {expected_status} status \
                 code."
            ),
        )
    }

    /// Alert for an outbound public IP that no longer matches the
    /// allow-listed value.
    pub fn public_ip_changed(observed: Option<&str>) -> Self {
        let observed = observed.unwrap_or("unknown");
        Self::new(
            "Public IP Address Changed",
            format!(
                "The public IP address of the server has changed to: {observed}. Please \
                 white-list this new IP. The monitor will terminate."
            ),
        )
    }
}

/// Delivery seam for alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, alert: &Alert) -> Result<(), AlertError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use lettre::error::Error as MessageError;

    use super::{Alert, AlertError, Notifier};

    /// Records alerts instead of delivering them; optionally fails every
    /// send to exercise the error boundary.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Alert>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self { sent: Mutex::new(Vec::new()), fail: true }
        }

        pub fn sent(&self) -> Vec<Alert> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, alert: &Alert) -> Result<(), AlertError> {
            if self.fail {
                return Err(AlertError::Message(MessageError::MissingFrom));
            }
            self.sent.lock().unwrap().push(alert.clone());
            Ok(())
        }
    }
}
