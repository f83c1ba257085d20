use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

use sg_shared::config::{RateLimitConfig, WindowLimit};

use crate::domain::entities::user::normalize_email;
use crate::errors::{AuthError, DomainResult};
use crate::services::store::{with_deadline, KeyValueStore, WindowCount};

/// Caller-identity scheme a counter is kept for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateScope {
    /// Generic request volume per client address
    ClientAddress,
    /// Login attempts per target account (email)
    LoginAccount,
}

impl RateScope {
    fn key_segment(&self) -> &'static str {
        match self {
            RateScope::ClientAddress => "ip",
            RateScope::LoginAccount => "login",
        }
    }
}

/// Result of a rate check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// End of the current window
    pub reset_at: DateTime<Utc>,
    /// Zero when allowed
    pub retry_after_seconds: u64,
}

impl RateDecision {
    fn unlimited(limit: u32) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit,
            reset_at: Utc::now(),
            retry_after_seconds: 0,
        }
    }

    fn from_window(limit: WindowLimit, counted: WindowCount) -> Self {
        let ttl_secs = ceil_secs(counted.ttl);
        let remaining = u64::from(limit.max_requests).saturating_sub(counted.count) as u32;

        Self {
            allowed: counted.incremented,
            limit: limit.max_requests,
            remaining,
            reset_at: Utc::now() + ChronoDuration::seconds(ttl_secs as i64),
            retry_after_seconds: if counted.incremented { 0 } else { ttl_secs.max(1) },
        }
    }

    fn into_error(self) -> AuthError {
        AuthError::RateLimited {
            retry_after_seconds: self.retry_after_seconds,
            limit: self.limit,
            reset_at: self.reset_at,
        }
    }
}

/// Fixed-window counter per (scope, identifier)
#[derive(Clone)]
pub struct RateGuard {
    store: Arc<dyn KeyValueStore>,
    config: RateLimitConfig,
    deadline: Duration,
}

impl RateGuard {
    pub fn new(store: Arc<dyn KeyValueStore>, config: RateLimitConfig, deadline: Duration) -> Self {
        Self {
            store,
            config,
            deadline,
        }
    }

    pub fn limit_for(&self, scope: RateScope) -> WindowLimit {
        match scope {
            RateScope::ClientAddress => self.config.client_address,
            RateScope::LoginAccount => self.config.login_account,
        }
    }

    /// Counter key. Account identifiers are normalized and hashed so no
    /// email address is stored in plain text.
    pub fn key_for(scope: RateScope, identifier: &str) -> String {
        let identifier = match scope {
            RateScope::ClientAddress => identifier.trim().to_string(),
            RateScope::LoginAccount => {
                hex::encode(Sha256::digest(normalize_email(identifier).as_bytes()))
            }
        };
        format!("rate_limit:{}:{}", scope.key_segment(), identifier)
    }

    /// Count one request and report whether it is admitted.
    ///
    /// A denied request does not increment the counter, so hammering a
    /// limited key never extends its window. Store failures are returned as
    /// `StoreUnavailable`, never as a denial.
    pub async fn check(&self, scope: RateScope, identifier: &str) -> DomainResult<RateDecision> {
        let limit = self.limit_for(scope);
        if !self.config.enabled {
            return Ok(RateDecision::unlimited(limit.max_requests));
        }

        let key = Self::key_for(scope, identifier);
        let window = Duration::from_secs(limit.window_seconds);
        let counted = with_deadline(
            self.deadline,
            self.store
                .increment_within_limit(&key, u64::from(limit.max_requests), window),
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, ?scope, "Rate limit check failed");
            e
        })?;

        let decision = RateDecision::from_window(limit, counted);
        if !decision.allowed {
            tracing::warn!(
                ?scope,
                key = %key,
                limit = decision.limit,
                retry_after = decision.retry_after_seconds,
                "Rate limit exceeded"
            );
        }
        Ok(decision)
    }

    /// Like [`check`](Self::check) but turns a denial into `AuthError::RateLimited`
    pub async fn enforce(&self, scope: RateScope, identifier: &str) -> DomainResult<RateDecision> {
        let decision = self.check(scope, identifier).await?;
        if decision.allowed {
            Ok(decision)
        } else {
            Err(decision.into_error().into())
        }
    }

    /// Current state of a counter without counting a request
    pub async fn status(&self, scope: RateScope, identifier: &str) -> DomainResult<RateDecision> {
        let limit = self.limit_for(scope);
        if !self.config.enabled {
            return Ok(RateDecision::unlimited(limit.max_requests));
        }

        let key = Self::key_for(scope, identifier);
        let count = with_deadline(self.deadline, self.store.get(&key))
            .await?
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        let ttl = with_deadline(self.deadline, self.store.ttl(&key))
            .await?
            .unwrap_or(Duration::ZERO);

        let max = u64::from(limit.max_requests);
        Ok(RateDecision::from_window(
            limit,
            WindowCount {
                count,
                ttl,
                incremented: count < max,
            },
        ))
    }

    /// Clear a counter, e.g. after an administrator unlocks an account
    pub async fn reset(&self, scope: RateScope, identifier: &str) -> DomainResult<()> {
        let key = Self::key_for(scope, identifier);
        with_deadline(self.deadline, self.store.delete(&key)).await?;
        tracing::info!(?scope, key = %key, "Rate limit counter reset");
        Ok(())
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
