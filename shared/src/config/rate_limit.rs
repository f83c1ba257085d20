//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// A single fixed-window limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WindowLimit {
    /// Requests admitted per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,
}

impl WindowLimit {
    pub const fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
        }
    }
}

/// Rate limiting configuration for the authentication endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Generic request volume per client address
    pub client_address: WindowLimit,

    /// Login attempts per target account
    pub login_account: WindowLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            client_address: WindowLimit::new(30, 60),
            login_account: WindowLimit::new(5, 60),
        }
    }
}

impl RateLimitConfig {
    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        Self {
            enabled: true,
            client_address: WindowLimit::new(300, 60),
            login_account: WindowLimit::new(20, 60),
        }
    }

    /// Create a production configuration (stricter limits)
    pub fn production() -> Self {
        Self::default()
    }

    /// Configuration with rate limiting switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Overlay environment variables on top of `self`
    pub fn with_env_overrides(self) -> Self {
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", self.enabled),
            client_address: WindowLimit::new(
                env_or("RATE_LIMIT_REQUESTS", self.client_address.max_requests),
                env_or("RATE_LIMIT_WINDOW_SECONDS", self.client_address.window_seconds),
            ),
            login_account: WindowLimit::new(
                env_or("LOGIN_RATE_LIMIT_ATTEMPTS", self.login_account.max_requests),
                env_or("LOGIN_RATE_LIMIT_WINDOW_SECONDS", self.login_account.window_seconds),
            ),
        }
    }
}

fn default_enabled() -> bool {
    true
}
