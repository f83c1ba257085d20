//! Error types for credential checks and token handling
//!
//! Messages here are for logs. The HTTP layer decides what a client sees and
//! never tells "revoked" apart from "invalid".

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::entities::token::TokenKind;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown account or wrong password; the two are never distinguished
    #[error("Invalid email or password")]
    CredentialInvalid,

    #[error("Rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimited {
        retry_after_seconds: u64,
        limit: u32,
        reset_at: DateTime<Utc>,
    },

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Registration disabled")]
    RegistrationDisabled,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    SignatureInvalid,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Wrong token kind: expected {expected}, got {actual}")]
    WrongTokenKind { expected: TokenKind, actual: TokenKind },

    #[error("Token revoked")]
    Revoked,

    #[error("Token issuance failed")]
    IssuanceFailed,
}
