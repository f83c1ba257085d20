//! Session facade: registration, login, rotation, validation and logout

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::domain::entities::user::{normalize_email, User, UserProfile};
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::UserRepository;
use crate::services::rate_guard::{RateGuard, RateScope};
use crate::services::revocation::RevocationStore;
use crate::services::store::KeyValueStore;
use crate::services::token::{Signer, TokenIssuer, TokenValidator};

use super::config::SessionConfig;
use super::traits::{CredentialHasher, EmailService};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Orchestrates the token lifecycle for credential-based accounts.
///
/// Every operation starts at the rate guard, then checks credentials or the
/// presented token, and ends in issuance or revocation. The facade holds no
/// session state of its own; revocation and rate counters live in the
/// shared store.
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    mailer: Arc<dyn EmailService>,
    issuer: TokenIssuer,
    validator: TokenValidator,
    revocation: RevocationStore,
    rate_guard: RateGuard,
    config: SessionConfig,
}

impl SessionService {
    /// Create a new session service
    ///
    /// # Arguments
    ///
    /// * `users` - User persistence
    /// * `hasher` - Credential hashing
    /// * `mailer` - Delivery of verification and reset links
    /// * `store` - Shared store for revocation entries and rate counters
    /// * `config` - Token lifetimes, limits and policies
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        mailer: Arc<dyn EmailService>,
        store: Arc<dyn KeyValueStore>,
        config: SessionConfig,
    ) -> Self {
        let signer = Arc::new(Signer::new(&config.token.jwt_secret));
        let revocation = RevocationStore::new(store.clone(), config.revocation_policy, config.store_timeout);
        let rate_guard = RateGuard::new(store, config.rate_limit.clone(), config.store_timeout);

        Self {
            users,
            hasher,
            mailer,
            issuer: TokenIssuer::new(signer.clone(), config.token.clone()),
            validator: TokenValidator::new(signer, revocation.clone()),
            revocation,
            rate_guard,
            config,
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn rate_guard(&self) -> &RateGuard {
        &self.rate_guard
    }

    /// Register a new account and sign it in
    ///
    /// # Arguments
    ///
    /// * `username` - Display name
    /// * `email` - Login identifier
    /// * `password` - Plain-text credential, hashed before storage
    /// * `client` - Caller address for the rate guard
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        client: &str,
    ) -> DomainResult<AuthResponse> {
        if !self.config.allow_registration {
            return Err(AuthError::RegistrationDisabled.into());
        }

        // Step 1: Rate limit by client address
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;

        // Step 2: Validate input and reject duplicates
        let username = username.trim();
        let email = normalize_email(email);
        validate_registration(username, &email, password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        // Step 3: Hash the credential and persist the user
        let password_hash = self.hasher.hash(password).await?;
        let user = self.users.create(User::new(username, &email, password_hash)).await?;
        tracing::info!(user_id = %user.id, "User registered");

        // Step 4: Send the verification link; delivery failure does not fail registration
        if let Err(e) = self.send_verification_email(&user).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
        }

        // Step 5: Issue the session pair
        let pair = self.issuer.issue_pair(&user)?;
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Authenticate with email and password
    ///
    /// Unknown accounts and wrong passwords both fail with
    /// `AuthError::CredentialInvalid`.
    pub async fn login(&self, email: &str, password: &str, client: &str) -> DomainResult<AuthResponse> {
        let email = normalize_email(email);

        // Step 1: Generic cap per address, then the per-account cap
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;
        self.rate_guard.enforce(RateScope::LoginAccount, &email).await?;

        // Step 2: Check the credential
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!(client, "Login attempt for unknown account");
                return Err(AuthError::CredentialInvalid.into());
            }
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, client, "Login attempt with wrong password");
            return Err(AuthError::CredentialInvalid.into());
        }

        // Step 3: Issue the session pair
        let pair = self.issuer.issue_pair(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Exchange a refresh token for a new pair, revoking the old refresh token.
    ///
    /// The old token is claimed with set-if-absent before the new pair is
    /// issued, so of several concurrent redemptions exactly one succeeds and
    /// the rest fail with `Revoked`.
    pub async fn refresh(&self, refresh_token: &str, client: &str) -> DomainResult<AuthResponse> {
        // Step 1: Rate limit by client address
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;

        // Step 2: Validate the refresh token
        let claims = self.validator.validate(refresh_token, Some(TokenKind::Refresh)).await?;

        // Step 3: The account must still exist
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::CredentialInvalid)?;

        // Step 4: Rotate, blacklisting the old refresh token
        if let Err(e) = self.consume(refresh_token, &claims).await {
            if matches!(e, DomainError::Token(TokenError::Revoked)) {
                tracing::warn!(user_id = %user.id, jti = %claims.jti, "Refresh token reuse detected");
            }
            return Err(e);
        }

        // Step 5: Issue the new pair
        let pair = self.issuer.issue_pair(&user)?;
        tracing::debug!(user_id = %user.id, "Session refreshed");
        Ok(AuthResponse::from_token_pair(pair, &user))
    }

    /// Validate an access token, revocation included
    pub async fn validate(&self, access_token: &str) -> DomainResult<Claims> {
        self.validator.validate(access_token, Some(TokenKind::Access)).await
    }

    /// Revoke the access token and, when given, the caller's refresh token
    ///
    /// Each is revoked for exactly its remaining lifetime. A supplied refresh
    /// token that already expired is ignored; one that is malformed, of the
    /// wrong kind or issued to another subject is rejected before either
    /// token is revoked.
    pub async fn logout(&self, access_token: &str, refresh_token: Option<&str>) -> DomainResult<()> {
        // Step 1: The access token must be valid and not yet revoked
        let claims = self.validate(access_token).await?;

        // Step 2: Check the refresh token before revoking anything
        let refresh_ttl = match refresh_token {
            Some(refresh_token) => match self.validator.inspect(refresh_token) {
                Ok(refresh_claims) => {
                    if refresh_claims.kind() != TokenKind::Refresh {
                        return Err(TokenError::WrongTokenKind {
                            expected: TokenKind::Refresh,
                            actual: refresh_claims.kind(),
                        }
                        .into());
                    }
                    if refresh_claims.sub != claims.sub {
                        tracing::warn!(user_id = %claims.sub, "Logout presented a refresh token of another user");
                        return Err(TokenError::Malformed.into());
                    }
                    refresh_claims.revocation_ttl().map(|ttl| (refresh_token, ttl))
                }
                Err(TokenError::Expired) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        // Step 3: Revoke both until their natural expiry
        if let Some(ttl) = claims.revocation_ttl() {
            self.revocation.revoke(access_token, ttl).await?;
        }
        if let Some((refresh_token, ttl)) = refresh_ttl {
            self.revocation.revoke(refresh_token, ttl).await?;
        }

        tracing::info!(user_id = %claims.sub, "User logged out");
        Ok(())
    }

    /// Email a password reset link if the account exists.
    ///
    /// Succeeds the same way for unknown addresses so the endpoint cannot be
    /// used to discover which accounts exist.
    pub async fn initiate_password_reset(&self, email: &str, client: &str) -> DomainResult<()> {
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;

        let email = normalize_email(email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::info!(client, "Password reset requested for unknown account");
            return Ok(());
        };

        let token = self.issuer.issue_password_reset_token(user.id, &user.email)?;
        let link = format!(
            "{}/api/v1/auth/reset-password?token={}",
            self.config.public_base_url, token
        );
        let body = format!(
            "Hello {},\n\nUse the link below to choose a new password. It expires in {} minutes.\n\n{}\n\nIf you did not ask for this, ignore this email.",
            user.username,
            self.config.token.password_reset_ttl / 60,
            link
        );

        self.mailer.send_email(&user.email, "Reset your password", &body).await?;
        tracing::info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    /// Set a new password using a single-use reset token
    pub async fn reset_password(&self, token: &str, new_password: &str, client: &str) -> DomainResult<()> {
        // Step 1: Rate limit by client address
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;
        validate_password(new_password)?;

        // Step 2: Validate the reset token against the live user record
        let claims = self.validator.validate(token, Some(TokenKind::PasswordReset)).await?;
        let mut user = self.user_for(&claims).await?;

        // Step 3: Consume the token, then store the new credential
        self.consume(token, &claims).await?;
        let password_hash = self.hasher.hash(new_password).await?;
        user.set_password_hash(password_hash);
        self.users.update(user.clone()).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Mark the account's email as verified using a single-use token
    pub async fn verify_email(&self, token: &str, client: &str) -> DomainResult<()> {
        self.rate_guard.enforce(RateScope::ClientAddress, client).await?;

        let claims = self.validator.validate(token, Some(TokenKind::EmailVerification)).await?;
        let mut user = self.user_for(&claims).await?;
        self.consume(token, &claims).await?;

        if !user.email_verified {
            user.verify_email();
            self.users.update(user.clone()).await?;
        }

        tracing::info!(user_id = %user.id, "Email verified");
        Ok(())
    }

    /// Profile of an authenticated user
    pub async fn profile(&self, user_id: Uuid) -> DomainResult<UserProfile> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })
    }

    async fn send_verification_email(&self, user: &User) -> DomainResult<()> {
        let token = self.issuer.issue_email_verification_token(user.id, &user.email)?;
        let link = format!("{}/api/v1/auth/verify-email/{}", self.config.public_base_url, token);
        let body = format!(
            "Welcome {},\n\nConfirm your email address by opening the link below:\n\n{}",
            user.username, link
        );

        self.mailer.send_email(&user.email, "Verify your email address", &body).await
    }

    /// User a single-use token was issued for; a token minted for an address
    /// the account no longer has is stale.
    async fn user_for(&self, claims: &Claims) -> DomainResult<User> {
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })?;

        if claims.email() != Some(user.email.as_str()) {
            return Err(TokenError::Malformed.into());
        }
        Ok(user)
    }

    /// Revoke a single-use token, failing if someone else already did
    async fn consume(&self, token: &str, claims: &Claims) -> DomainResult<()> {
        let ttl = claims.revocation_ttl().ok_or(TokenError::Expired)?;
        if !self.revocation.revoke_once(token, ttl).await? {
            return Err(TokenError::Revoked.into());
        }
        Ok(())
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> DomainResult<()> {
    if username.chars().count() < 3 || username.chars().count() > 50 {
        return Err(DomainError::Validation {
            message: "username must be between 3 and 50 characters".to_string(),
        });
    }
    if !is_plausible_email(email) {
        return Err(DomainError::Validation {
            message: "email address is invalid".to_string(),
        });
    }
    validate_password(password)
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::Validation {
            message: format!("password must be at least {} characters", MIN_PASSWORD_LENGTH),
        });
    }
    Ok(())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
