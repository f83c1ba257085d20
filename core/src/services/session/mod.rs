//! Session facade module
//!
//! Composes the rate guard, token issuer and validator, and the revocation
//! store into the register/login/refresh/validate/logout flows, plus the
//! password reset and email verification flows built on the same tokens.

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use service::{SessionService, MIN_PASSWORD_LENGTH};
pub use traits::{CredentialHasher, EmailService};
