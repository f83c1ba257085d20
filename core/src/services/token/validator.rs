//! Token validation: signature, expiry, revocation, then kind

use std::sync::Arc;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{DomainResult, TokenError};
use crate::services::revocation::RevocationStore;

use super::signer::Signer;

/// Strip an optional `Bearer ` prefix and surrounding whitespace
pub fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .map(str::trim)
        .unwrap_or(token)
}

/// Validates presented tokens against the signer and the revocation overlay
#[derive(Clone)]
pub struct TokenValidator {
    signer: Arc<Signer>,
    revocation: RevocationStore,
}

impl TokenValidator {
    pub fn new(signer: Arc<Signer>, revocation: RevocationStore) -> Self {
        Self { signer, revocation }
    }

    /// Validate `token`, optionally requiring a specific kind.
    ///
    /// Steps run in a fixed order and stop at the first failure:
    /// 1. strip `Bearer `, empty input is `Malformed`
    /// 2. signature, expiry and not-before
    /// 3. revocation lookup (store failures follow the configured policy)
    /// 4. kind check
    pub async fn validate(&self, token: &str, expected_kind: Option<TokenKind>) -> DomainResult<Claims> {
        let claims = self.inspect(token)?;

        if self.revocation.is_revoked(token).await? {
            tracing::info!(user_id = %claims.sub, jti = %claims.jti, kind = %claims.kind(), "Rejected revoked token");
            return Err(TokenError::Revoked.into());
        }

        if let Some(expected) = expected_kind {
            let actual = claims.kind();
            if actual != expected {
                tracing::debug!(%expected, %actual, "Rejected token of wrong kind");
                return Err(TokenError::WrongTokenKind { expected, actual }.into());
            }
        }

        Ok(claims)
    }

    /// Steps 1 and 2 only: cryptographic checks without a store round trip
    pub fn inspect(&self, token: &str) -> Result<Claims, TokenError> {
        let token = strip_bearer(token);
        if token.is_empty() {
            return Err(TokenError::Malformed);
        }
        self.signer.verify(token)
    }
}
