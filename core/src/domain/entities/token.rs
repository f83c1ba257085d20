//! Token entities for JWT-based session handling.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind carried by every token; it decides which operations accept it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    PasswordReset,
    EmailVerification,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::PasswordReset => "password_reset",
            TokenKind::EmailVerification => "email_verification",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific part of the claim set.
///
/// Serialized flat next to the registered claims, discriminated by `type`.
/// A payload whose `type` is unknown or that lacks a field its kind requires
/// does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaimBody {
    Access { username: String, email: String },
    /// Subject only; profile data is re-read from the user record on use
    Refresh,
    PasswordReset { email: String },
    EmailVerification { email: String },
}

impl ClaimBody {
    pub fn kind(&self) -> TokenKind {
        match self {
            ClaimBody::Access { .. } => TokenKind::Access,
            ClaimBody::Refresh => TokenKind::Refresh,
            ClaimBody::PasswordReset { .. } => TokenKind::PasswordReset,
            ClaimBody::EmailVerification { .. } => TokenKind::EmailVerification,
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// JWT ID, unique per token even when two are minted in the same second
    pub jti: String,

    #[serde(flatten)]
    pub body: ClaimBody,
}

impl Claims {
    /// Creates claims valid from now for `lifetime_seconds`
    ///
    /// # Arguments
    ///
    /// * `user_id` - The subject
    /// * `body` - Kind-specific claims
    /// * `lifetime_seconds` - Seconds until expiry
    pub fn new(user_id: Uuid, body: ClaimBody, lifetime_seconds: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(lifetime_seconds);

        Self {
            sub: user_id,
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
            body,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.body.kind()
    }

    /// Username, present on access tokens only
    pub fn username(&self) -> Option<&str> {
        match &self.body {
            ClaimBody::Access { username, .. } => Some(username),
            _ => None,
        }
    }

    /// Email, absent on refresh tokens
    pub fn email(&self) -> Option<&str> {
        match &self.body {
            ClaimBody::Access { email, .. }
            | ClaimBody::PasswordReset { email }
            | ClaimBody::EmailVerification { email } => Some(email),
            ClaimBody::Refresh => None,
        }
    }

    /// Checks if the claims have expired (`exp` itself is still valid)
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// How long a revocation entry for this token must live.
    ///
    /// Covers the whole second in which `exp` falls, since a token is still
    /// accepted at `now == exp`. `None` once the token can no longer verify.
    pub fn revocation_ttl(&self) -> Option<std::time::Duration> {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining < 0 {
            None
        } else {
            Some(std::time::Duration::from_secs(remaining as u64 + 1))
        }
    }
}

/// Token pair returned on registration, login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub access_expires_in: i64,
    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}
