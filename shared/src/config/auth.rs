//! Authentication and token configuration

use serde::{Deserialize, Serialize};

use super::env_or;

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing and lifetime configuration
///
/// Lifetimes are expressed in seconds. The signing algorithm is fixed to
/// HS256 and is therefore not configurable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret used to sign and verify tokens
    pub secret: String,

    /// Access token lifetime
    pub access_token_expiry: i64,

    /// Refresh token lifetime
    pub refresh_token_expiry: i64,

    /// Password reset token lifetime
    #[serde(default = "default_password_reset_expiry")]
    pub password_reset_expiry: i64,

    /// Email verification token lifetime
    #[serde(default = "default_email_verification_expiry")]
    pub email_verification_expiry: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 3600,    // 1 hour
            refresh_token_expiry: 86400,  // 24 hours
            password_reset_expiry: default_password_reset_expiry(),
            email_verification_expiry: default_email_verification_expiry(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Longest lifetime of any token kind, the upper bound for revocation entries
    pub fn max_token_expiry(&self) -> i64 {
        self.access_token_expiry
            .max(self.refresh_token_expiry)
            .max(self.password_reset_expiry)
            .max(self.email_verification_expiry)
    }
}

/// Behaviour of revocation reads when the shared store cannot be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevocationFailurePolicy {
    /// Treat an unreachable store as a validation failure
    #[default]
    FailClosed,
    /// Treat an unreachable store as "not revoked"
    FailOpen,
}

impl std::str::FromStr for RevocationFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail_closed" | "closed" => Ok(Self::FailClosed),
            "fail_open" | "open" => Ok(Self::FailOpen),
            _ => Err(format!("Invalid revocation failure policy: {}", s)),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Revocation read policy on store outage
    #[serde(default)]
    pub revocation_failure_policy: RevocationFailurePolicy,

    /// Accept new registrations
    #[serde(default = "default_allow_registration")]
    pub allow_registration: bool,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let secret = std::env::var("JWT_SECRET").unwrap_or(defaults.secret);

        Self {
            jwt: JwtConfig {
                secret,
                access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
                refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
                password_reset_expiry: env_or("JWT_PASSWORD_RESET_EXPIRY", defaults.password_reset_expiry),
                email_verification_expiry: env_or(
                    "JWT_EMAIL_VERIFICATION_EXPIRY",
                    defaults.email_verification_expiry,
                ),
            },
            revocation_failure_policy: env_or("REVOCATION_FAILURE_POLICY", RevocationFailurePolicy::default()),
            allow_registration: env_or("ALLOW_REGISTRATION", default_allow_registration()),
        }
    }
}

fn default_password_reset_expiry() -> i64 {
    3600 // 1 hour
}

fn default_email_verification_expiry() -> i64 {
    86400 // 24 hours
}

fn default_allow_registration() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.refresh_token_expiry, 86400);
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1_209_600);
        assert_eq!(config.max_token_expiry(), 1_209_600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_revocation_policy_parsing() {
        assert_eq!(
            "fail-open".parse::<RevocationFailurePolicy>().unwrap(),
            RevocationFailurePolicy::FailOpen
        );
        assert_eq!(
            "FAIL_CLOSED".parse::<RevocationFailurePolicy>().unwrap(),
            RevocationFailurePolicy::FailClosed
        );
        assert!("sometimes".parse::<RevocationFailurePolicy>().is_err());
        assert_eq!(RevocationFailurePolicy::default(), RevocationFailurePolicy::FailClosed);
    }
}
