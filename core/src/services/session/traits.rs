//! Collaborators the session facade consumes

use async_trait::async_trait;

use crate::errors::DomainError;

/// One-way credential hashing
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// `Ok(false)` on mismatch; `Err` only when the hash cannot be checked at all
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Outbound email delivery
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}
