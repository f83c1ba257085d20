//! Unit tests for the fixed-window rate guard

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use sg_shared::config::{RateLimitConfig, WindowLimit};

use crate::errors::{AuthError, DomainError};
use crate::services::rate_guard::{RateGuard, RateScope};
use crate::services::store::test_support::UnavailableStore;
use crate::services::store::{KeyValueStore, MemoryStore};

const LIMIT: u32 = 5;
const WINDOW: u64 = 60;

fn config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        client_address: WindowLimit::new(LIMIT, WINDOW),
        login_account: WindowLimit::new(3, 300),
    }
}

fn guard_over(store: Arc<dyn KeyValueStore>, config: RateLimitConfig) -> RateGuard {
    RateGuard::new(store, config, Duration::from_millis(200))
}

#[tokio::test(start_paused = true)]
async fn test_limit_then_deny_then_new_window() {
    let guard = guard_over(Arc::new(MemoryStore::new()), config());

    for used in 1..=LIMIT {
        let decision = guard.check(RateScope::ClientAddress, "10.0.0.1").await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, LIMIT - used);
    }

    let denied = guard.check(RateScope::ClientAddress, "10.0.0.1").await.unwrap();
    assert!(!denied.allowed);
    assert_eq!(denied.remaining, 0);
    assert!(denied.retry_after_seconds > 0 && denied.retry_after_seconds <= WINDOW);
    assert!(denied.reset_at <= Utc::now() + ChronoDuration::seconds(WINDOW as i64));

    tokio::time::advance(Duration::from_secs(WINDOW)).await;

    let fresh = guard.check(RateScope::ClientAddress, "10.0.0.1").await.unwrap();
    assert!(fresh.allowed);
    assert_eq!(fresh.remaining, LIMIT - 1);
}

#[tokio::test(start_paused = true)]
async fn test_denials_do_not_extend_the_window() {
    let guard = guard_over(Arc::new(MemoryStore::new()), config());

    for _ in 0..LIMIT {
        guard.check(RateScope::ClientAddress, "10.0.0.2").await.unwrap();
    }
    tokio::time::advance(Duration::from_secs(30)).await;
    for _ in 0..10 {
        let denied = guard.check(RateScope::ClientAddress, "10.0.0.2").await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_seconds, 30);
    }

    tokio::time::advance(Duration::from_secs(30)).await;
    assert!(guard.check(RateScope::ClientAddress, "10.0.0.2").await.unwrap().allowed);
}

#[tokio::test]
async fn test_enforce_returns_rate_limited() {
    let guard = guard_over(Arc::new(MemoryStore::new()), config());

    for _ in 0..3 {
        guard.enforce(RateScope::LoginAccount, "alice@example.com").await.unwrap();
    }
    let err = guard
        .enforce(RateScope::LoginAccount, "alice@example.com")
        .await
        .unwrap_err();

    match err {
        DomainError::Auth(AuthError::RateLimited { limit, retry_after_seconds, .. }) => {
            assert_eq!(limit, 3);
            assert!(retry_after_seconds <= 300);
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_checks_admit_exactly_the_limit() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let guard = Arc::new(guard_over(
        store,
        RateLimitConfig {
            enabled: true,
            client_address: WindowLimit::new(10, 60),
            login_account: WindowLimit::new(10, 60),
        },
    ));

    let mut handles = Vec::new();
    for _ in 0..40 {
        let guard = guard.clone();
        handles.push(tokio::spawn(async move {
            guard
                .check(RateScope::ClientAddress, "203.0.113.9")
                .await
                .map(|decision| decision.allowed)
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 10);
}

#[tokio::test]
async fn test_scopes_and_identifiers_are_independent() {
    let guard = guard_over(Arc::new(MemoryStore::new()), config());

    for _ in 0..3 {
        guard.check(RateScope::LoginAccount, "alice@example.com").await.unwrap();
    }
    assert!(!guard.check(RateScope::LoginAccount, "alice@example.com").await.unwrap().allowed);
    assert!(guard.check(RateScope::LoginAccount, "bob@example.com").await.unwrap().allowed);
    assert!(guard.check(RateScope::ClientAddress, "alice@example.com").await.unwrap().allowed);
}

#[tokio::test]
async fn test_login_key_is_normalized_and_hashed() {
    let key = RateGuard::key_for(RateScope::LoginAccount, " Alice@Example.com ");
    assert_eq!(key, RateGuard::key_for(RateScope::LoginAccount, "alice@example.com"));
    assert!(key.starts_with("rate_limit:login:"));
    assert!(!key.contains("alice"));

    assert_eq!(
        RateGuard::key_for(RateScope::ClientAddress, "192.168.1.10"),
        "rate_limit:ip:192.168.1.10"
    );
}

#[tokio::test]
async fn test_status_does_not_count_and_reset_clears() {
    let guard = guard_over(Arc::new(MemoryStore::new()), config());

    for _ in 0..2 {
        guard.check(RateScope::ClientAddress, "10.0.0.3").await.unwrap();
    }
    let status = guard.status(RateScope::ClientAddress, "10.0.0.3").await.unwrap();
    assert_eq!(status.remaining, LIMIT - 2);
    let again = guard.status(RateScope::ClientAddress, "10.0.0.3").await.unwrap();
    assert_eq!(again.remaining, LIMIT - 2);

    guard.reset(RateScope::ClientAddress, "10.0.0.3").await.unwrap();
    let cleared = guard.status(RateScope::ClientAddress, "10.0.0.3").await.unwrap();
    assert_eq!(cleared.remaining, LIMIT);
}

#[tokio::test]
async fn test_disabled_guard_always_allows() {
    let guard = guard_over(Arc::new(UnavailableStore), RateLimitConfig::disabled());

    for _ in 0..100 {
        assert!(guard.check(RateScope::ClientAddress, "10.0.0.4").await.unwrap().allowed);
    }
}

#[tokio::test]
async fn test_store_failure_is_not_a_denial() {
    let guard = guard_over(Arc::new(UnavailableStore), config());

    let result = guard.check(RateScope::ClientAddress, "10.0.0.5").await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}
