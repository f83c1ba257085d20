//! Revocation overlay on top of the shared key-value store
//!
//! A revoked token is recorded as `blacklist:<sha256(token)>` with a TTL equal
//! to the token's remaining lifetime, so the entry disappears once the token
//! could no longer verify anyway. Absence means "not revoked".

use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use sg_shared::config::RevocationFailurePolicy;

use crate::errors::DomainResult;
use crate::services::store::{with_deadline, KeyValueStore};
use crate::services::token::strip_bearer;

const KEY_PREFIX: &str = "blacklist:";
const MARKER: &str = "revoked";

/// Records and looks up revoked tokens
#[derive(Clone)]
pub struct RevocationStore {
    store: Arc<dyn KeyValueStore>,
    policy: RevocationFailurePolicy,
    deadline: Duration,
}

impl RevocationStore {
    /// # Arguments
    ///
    /// * `store` - Shared key-value store
    /// * `policy` - What `is_revoked` reports when the store cannot be reached
    /// * `deadline` - Upper bound for every store call
    pub fn new(store: Arc<dyn KeyValueStore>, policy: RevocationFailurePolicy, deadline: Duration) -> Self {
        Self {
            store,
            policy,
            deadline,
        }
    }

    pub fn policy(&self) -> RevocationFailurePolicy {
        self.policy
    }

    /// Store key for `token`; the raw token never reaches the store
    pub fn key_for(token: &str) -> String {
        let digest = Sha256::digest(strip_bearer(token).as_bytes());
        format!("{}{}", KEY_PREFIX, hex::encode(digest))
    }

    /// Revoke `token` for `ttl`.
    ///
    /// A zero `ttl` means the token has already expired and nothing is
    /// written. Store failures are returned, never swallowed.
    pub async fn revoke(&self, token: &str, ttl: Duration) -> DomainResult<()> {
        if ttl.is_zero() {
            return Ok(());
        }

        let key = Self::key_for(token);
        with_deadline(self.deadline, self.store.set_with_expiry(&key, MARKER, ttl))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to write revocation entry");
                e
            })?;

        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "Token revoked");
        Ok(())
    }

    /// Revoke `token` only if it is not revoked yet.
    ///
    /// Returns `true` for exactly one caller per token, which makes single-use
    /// redemption (refresh rotation, reset links) race-free across instances.
    pub async fn revoke_once(&self, token: &str, ttl: Duration) -> DomainResult<bool> {
        if ttl.is_zero() {
            return Ok(false);
        }

        let key = Self::key_for(token);
        let claimed = with_deadline(self.deadline, self.store.set_if_absent(&key, MARKER, ttl))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to claim revocation entry");
                e
            })?;

        Ok(claimed)
    }

    /// Whether `token` has been revoked.
    ///
    /// Under `FailClosed` a store failure is returned as `StoreUnavailable`;
    /// under `FailOpen` it is logged and reported as not revoked.
    pub async fn is_revoked(&self, token: &str) -> DomainResult<bool> {
        let key = Self::key_for(token);
        match with_deadline(self.deadline, self.store.exists(&key)).await {
            Ok(revoked) => Ok(revoked),
            Err(e) => match self.policy {
                RevocationFailurePolicy::FailClosed => {
                    tracing::error!(error = %e, "Revocation lookup failed, rejecting token");
                    Err(e.into())
                }
                RevocationFailurePolicy::FailOpen => {
                    tracing::warn!(error = %e, "Revocation lookup failed, accepting token (fail-open)");
                    Ok(false)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests;
