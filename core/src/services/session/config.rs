//! Configuration for the session facade

use std::time::Duration;

use sg_shared::config::{AppConfig, RateLimitConfig, RevocationFailurePolicy};

use crate::services::token::TokenServiceConfig;

/// Everything the session facade needs, assembled from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token: TokenServiceConfig,
    pub rate_limit: RateLimitConfig,
    pub revocation_policy: RevocationFailurePolicy,
    /// Deadline for each call to the shared store
    pub store_timeout: Duration,
    /// Base for links sent by email, without trailing slash
    pub public_base_url: String,
    pub allow_registration: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token: TokenServiceConfig::default(),
            rate_limit: RateLimitConfig::default(),
            revocation_policy: RevocationFailurePolicy::default(),
            store_timeout: Duration::from_millis(500),
            public_base_url: "http://localhost:8080".to_string(),
            allow_registration: true,
        }
    }
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            token: TokenServiceConfig::from(&config.auth.jwt),
            rate_limit: config.rate_limit.clone(),
            revocation_policy: config.auth.revocation_failure_policy,
            store_timeout: config.cache.operation_timeout(),
            public_base_url: config.server.public_base_url.trim_end_matches('/').to_string(),
            allow_registration: config.auth.allow_registration,
        }
    }
}
