//! Integration tests for the Redis-backed store
//!
//! Run with a local Redis: `cargo test -p sg_infra -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use sg_core::services::store::KeyValueStore;
use sg_core::services::{RateGuard, RateScope, RevocationStore};
use sg_infra::cache::{RedisClient, RedisStore};
use sg_shared::config::{CacheConfig, RateLimitConfig, RevocationFailurePolicy, WindowLimit};
use uuid::Uuid;

async fn store() -> RedisStore {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let config = CacheConfig::new(url).with_prefix(format!("sg-test-{}", Uuid::new_v4()));
    RedisStore::new(RedisClient::new(config).await.expect("Redis must be running"))
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_basic_operations() {
    let store = store().await;

    store.set_with_expiry("k", "v", Duration::from_secs(60)).await.unwrap();
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    assert!(store.exists("k").await.unwrap());

    let ttl = store.ttl("k").await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(60) && ttl > Duration::from_secs(55));

    assert!(store.delete("k").await.unwrap());
    assert!(!store.delete("k").await.unwrap());
    assert_eq!(store.ttl("k").await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_set_if_absent() {
    let store = store().await;
    let ttl = Duration::from_secs(30);

    assert!(store.set_if_absent("once", "1", ttl).await.unwrap());
    assert!(!store.set_if_absent("once", "2", ttl).await.unwrap());
    assert_eq!(store.get("once").await.unwrap().as_deref(), Some("1"));
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_entry_expires() {
    let store = store().await;

    store.set_with_expiry("short", "1", Duration::from_millis(200)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!store.exists("short").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_bounded_increment_does_not_extend_window() {
    let store = store().await;
    let window = Duration::from_secs(2);

    for expected in 1..=3 {
        let counted = store.increment_within_limit("ctr", 3, window).await.unwrap();
        assert_eq!(counted.count, expected);
        assert!(counted.incremented);
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    let denied = store.increment_within_limit("ctr", 3, window).await.unwrap();
    assert!(!denied.incremented);
    assert_eq!(denied.count, 3);
    assert!(denied.ttl < Duration::from_millis(1600));

    tokio::time::sleep(Duration::from_millis(1700)).await;
    let fresh = store.increment_within_limit("ctr", 3, window).await.unwrap();
    assert_eq!(fresh.count, 1);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_concurrent_requests_admit_exactly_the_limit() {
    let store: Arc<dyn KeyValueStore> = Arc::new(store().await);
    let config = RateLimitConfig {
        enabled: true,
        client_address: WindowLimit::new(10, 60),
        login_account: WindowLimit::new(5, 60),
    };
    let guard = Arc::new(RateGuard::new(store, config, Duration::from_secs(2)));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let guard = Arc::clone(&guard);
        handles.push(tokio::spawn(async move {
            guard.check(RateScope::ClientAddress, "203.0.113.9").await.unwrap().allowed
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if handle.await.unwrap() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 10);
}

#[tokio::test]
#[ignore] // Requires Redis to be running
async fn test_revocation_round_trip() {
    let store: Arc<dyn KeyValueStore> = Arc::new(store().await);
    let revocations = RevocationStore::new(store, RevocationFailurePolicy::FailClosed, Duration::from_secs(2));

    assert!(!revocations.is_revoked("Bearer abc.def.ghi").await.unwrap());
    revocations.revoke("abc.def.ghi", Duration::from_secs(5)).await.unwrap();
    assert!(revocations.is_revoked("Bearer abc.def.ghi").await.unwrap());
}
