//! Configuration for token issuance

use sg_shared::config::JwtConfig;

/// Secret and per-kind lifetimes (seconds) used by the signer and issuer
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    pub access_token_ttl: i64,
    pub refresh_token_ttl: i64,
    pub password_reset_ttl: i64,
    pub email_verification_ttl: i64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            access_token_ttl: jwt.access_token_expiry,
            refresh_token_ttl: jwt.refresh_token_expiry,
            password_reset_ttl: jwt.password_reset_expiry,
            email_verification_ttl: jwt.email_verification_expiry,
        }
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("password_reset_ttl", &self.password_reset_ttl)
            .field("email_verification_ttl", &self.email_verification_ttl)
            .finish()
    }
}
