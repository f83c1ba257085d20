//! Outgoing email configuration module

use serde::{Deserialize, Serialize};

/// Sender settings for verification and password reset mail
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Address the messages are sent from
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
        }
    }
}

impl EmailConfig {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        std::env::var("EMAIL_FROM")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }
}

fn default_from_address() -> String {
    String::from("no-reply@sessiongate.local")
}
