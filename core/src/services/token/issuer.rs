//! Token issuance with typed claims and per-kind lifetimes

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{ClaimBody, Claims, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::signer::Signer;

/// Builds and signs tokens of every kind
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    signer: Arc<Signer>,
    config: TokenServiceConfig,
}

impl TokenIssuer {
    pub fn new(signer: Arc<Signer>, config: TokenServiceConfig) -> Self {
        Self { signer, config }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issue an access token carrying the user's profile
    ///
    /// # Arguments
    ///
    /// * `user_id` - Subject
    /// * `username` - Display name embedded in the claims
    /// * `email` - Email embedded in the claims
    pub fn issue_access_token(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> Result<String, TokenError> {
        if username.is_empty() || email.is_empty() {
            tracing::error!(user_id = %user_id, "Access token requested with empty profile claims");
            return Err(TokenError::IssuanceFailed);
        }
        let body = ClaimBody::Access {
            username: username.to_string(),
            email: email.to_string(),
        };
        self.issue(user_id, body, self.config.access_token_ttl)
    }

    /// Issue a refresh token; it carries the subject only
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue(user_id, ClaimBody::Refresh, self.config.refresh_token_ttl)
    }

    pub fn issue_password_reset_token(&self, user_id: Uuid, email: &str) -> Result<String, TokenError> {
        let body = ClaimBody::PasswordReset {
            email: email.to_string(),
        };
        self.issue(user_id, body, self.config.password_reset_ttl)
    }

    pub fn issue_email_verification_token(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<String, TokenError> {
        let body = ClaimBody::EmailVerification {
            email: email.to_string(),
        };
        self.issue(user_id, body, self.config.email_verification_ttl)
    }

    /// Issue an independent access and refresh token for `user`
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        let access_token = self.issue_access_token(user.id, &user.username, &user.email)?;
        let refresh_token = self.issue_refresh_token(user.id)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_in: self.config.access_token_ttl,
            refresh_expires_in: self.config.refresh_token_ttl,
        })
    }

    fn issue(&self, user_id: Uuid, body: ClaimBody, lifetime: i64) -> Result<String, TokenError> {
        if user_id.is_nil() || lifetime <= 0 {
            tracing::error!(
                user_id = %user_id,
                lifetime,
                "Refusing to issue token with empty subject or non-positive lifetime"
            );
            return Err(TokenError::IssuanceFailed);
        }

        let claims = Claims::new(user_id, body, lifetime);
        let token = self.signer.sign(&claims)?;
        tracing::debug!(user_id = %user_id, kind = %claims.kind(), jti = %claims.jti, "Issued token");
        Ok(token)
    }
}
