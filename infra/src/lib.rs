//! # Infrastructure Layer
//!
//! Concrete adapters for the traits declared in `sg_core`:
//! - **Cache**: Redis-backed [`sg_core::KeyValueStore`] for revocation and rate limiting
//! - **Database**: MySQL user repository using SQLx
//! - **Security**: bcrypt credential hashing
//! - **Email**: delivery through the tracing log

pub mod cache;
pub mod database;
pub mod email;
pub mod security;

pub use cache::{RedisClient, RedisStore};
pub use database::{DatabasePool, MySqlUserRepository};
pub use email::LogEmailService;
pub use security::BcryptHasher;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
