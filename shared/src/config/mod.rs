//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token lifetimes, signing secret and revocation policy
//! - `cache` - Redis connection for the revocation and rate-limit store
//! - `database` - MySQL connection pool for user records
//! - `email` - sender address for outgoing mail
//! - `environment` - environment detection and logging configuration
//! - `rate_limit` - fixed-window limits per client address and login account
//! - `server` - HTTP bind address and public base URL

pub mod auth;
pub mod cache;
pub mod database;
pub mod email;
pub mod environment;
pub mod rate_limit;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig, RevocationFailurePolicy};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use environment::{Environment, LoggingConfig};
pub use rate_limit::{RateLimitConfig, WindowLimit};
pub use server::ServerConfig;

/// Configuration that cannot be used to start the service
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0}")]
    DefaultSecret(Environment),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::new("mysql://localhost:3306/sessiongate_dev"),
            rate_limit: RateLimitConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
            ..Default::default()
        }
    }

    /// Create configuration for staging environment (production limits)
    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            rate_limit: RateLimitConfig::production(),
            logging: LoggingConfig::for_environment(Environment::Staging),
            ..Default::default()
        }
    }

    /// Base profile for an environment
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::development(),
            Environment::Staging => Self::staging(),
            Environment::Production => Self::production(),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            database: DatabaseConfig::default().with_max_connections(50),
            rate_limit: RateLimitConfig::production(),
            logging: LoggingConfig::for_environment(Environment::Production),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// The environment picks the base profile, then each section reads its
    /// own variables on top of it.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let base = Self::for_environment(environment);

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            cache: CacheConfig::from_env(),
            rate_limit: base.rate_limit.with_env_overrides(),
            email: EmailConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject configurations that must never reach a running server
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::DefaultSecret(self.environment));
        }
        if self.auth.jwt.secret.is_empty() {
            return Err(ConfigError::Invalid {
                field: "JWT_SECRET",
                message: "secret must not be empty".to_string(),
            });
        }
        if self.auth.jwt.access_token_expiry <= 0 || self.auth.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                field: "JWT_*_EXPIRY",
                message: "token lifetimes must be positive".to_string(),
            });
        }
        let limits = [self.rate_limit.client_address, self.rate_limit.login_account];
        if limits.iter().any(|l| l.max_requests == 0 || l.window_seconds == 0) {
            return Err(ConfigError::Invalid {
                field: "RATE_LIMIT_*",
                message: "limits and windows must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// missing or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
