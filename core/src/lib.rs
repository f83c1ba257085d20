//! # SessionGate Core
//!
//! Token lifecycle and revocation for credential-based authentication:
//! signing, issuance and validation of typed tokens, a revocation overlay and
//! a fixed-window rate guard on a shared key-value store, and the session
//! facade composing them. Persistence, hashing and email delivery are traits
//! implemented by the infrastructure crate.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{ClaimBody, Claims, TokenKind, TokenPair, User, UserProfile};
pub use domain::value_objects::AuthResponse;
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{InMemoryUserRepository, UserRepository};
pub use services::{
    CredentialHasher, EmailService, KeyValueStore, MemoryStore, RateDecision, RateGuard, RateScope,
    RevocationStore, SessionConfig, SessionService, StoreError, TokenValidator, WindowCount,
};
