//! bcrypt implementation of [`CredentialHasher`]
//!
//! Hashing is CPU-bound, so both operations run on the blocking pool to keep
//! the async workers free.

use async_trait::async_trait;

use sg_core::errors::DomainError;
use sg_core::CredentialHasher;

/// bcrypt hasher with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }
}

impl BcryptHasher {
    /// `cost` is clamped to the range bcrypt accepts (4..=31)
    pub fn with_cost(cost: u32) -> Self {
        Self { cost: cost.clamp(4, 31) }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

fn internal(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| internal("Hashing task failed", e))?
            .map_err(|e| internal("Failed to hash password", e))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| internal("Verification task failed", e))?
            .map_err(|e| internal("Failed to verify password", e))
    }
}
