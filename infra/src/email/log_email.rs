//! [`EmailService`] that writes messages to the tracing log
//!
//! Stands in for an SMTP relay in development and tests. Message bodies
//! carry live tokens, so they are logged at debug level only.

use async_trait::async_trait;
use tracing::{debug, info};

use sg_core::errors::DomainError;
use sg_core::EmailService;

#[derive(Debug, Clone, Default)]
pub struct LogEmailService {
    sender: String,
}

impl LogEmailService {
    pub fn new(sender: impl Into<String>) -> Self {
        Self { sender: sender.into() }
    }
}

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        if to.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Recipient address is empty".to_string(),
            });
        }

        info!(from = %self.sender, to = %to, subject = %subject, "Email dispatched");
        debug!(to = %to, body = %body, "Email body");
        Ok(())
    }
}
