//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use thiserror::Error;

use crate::services::store::StoreError;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// The shared key-value store could not be reached in time.
    /// Retryable, and distinct from an explicit rate-limit denial.
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::StoreUnavailable {
            message: err.to_string(),
        }
    }
}

impl DomainError {
    /// Token error carried by this error, if any
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable { .. } | DomainError::Auth(AuthError::RateLimited { .. })
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
