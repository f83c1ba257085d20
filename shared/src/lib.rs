//! Shared configuration and response types for SessionGate
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types loaded from the environment
//! - The JSON error body returned by the HTTP layer

pub mod config;
pub mod errors;

pub use config::{
    AppConfig, AuthConfig, CacheConfig, ConfigError, DatabaseConfig, EmailConfig, Environment, JwtConfig,
    LoggingConfig, RateLimitConfig, RevocationFailurePolicy, ServerConfig, WindowLimit,
};
pub use errors::{error_codes, ErrorResponse};
