//! Token services: signing, issuance and validation
//!
//! - [`Signer`] signs and verifies HS256 claim sets
//! - [`TokenIssuer`] builds access, refresh, password reset and email
//!   verification tokens
//! - [`TokenValidator`] verifies a presented token and checks it against the
//!   revocation overlay

mod config;
mod issuer;
mod signer;
mod validator;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use signer::{Signer, SIGNING_ALGORITHM};
pub use validator::{strip_bearer, TokenValidator};
