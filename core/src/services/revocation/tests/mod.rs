//! Unit tests for the revocation overlay

use std::sync::Arc;
use std::time::Duration;

use sg_shared::config::RevocationFailurePolicy;

use crate::errors::DomainError;
use crate::services::revocation::RevocationStore;
use crate::services::store::test_support::{StalledStore, UnavailableStore};
use crate::services::store::{KeyValueStore, MemoryStore};

const DEADLINE: Duration = Duration::from_millis(200);

fn revocation_over(store: Arc<dyn KeyValueStore>, policy: RevocationFailurePolicy) -> RevocationStore {
    RevocationStore::new(store, policy, DEADLINE)
}

#[tokio::test(start_paused = true)]
async fn test_revoked_until_natural_expiry_then_gone() {
    let memory = MemoryStore::new();
    let revocation = revocation_over(Arc::new(memory.clone()), RevocationFailurePolicy::FailClosed);

    revocation.revoke("token-a", Duration::from_secs(5)).await.unwrap();
    assert!(revocation.is_revoked("token-a").await.unwrap());
    assert!(!revocation.is_revoked("token-b").await.unwrap());

    tokio::time::advance(Duration::from_secs(4)).await;
    assert!(revocation.is_revoked("token-a").await.unwrap());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(!revocation.is_revoked("token-a").await.unwrap());
    assert_eq!(memory.entry_count().await, 0);
}

#[tokio::test]
async fn test_key_is_hashed_and_ignores_bearer_prefix() {
    let key = RevocationStore::key_for("abc.def.ghi");
    assert!(key.starts_with("blacklist:"));
    assert!(!key.contains("abc.def.ghi"));
    assert_eq!(key.len(), "blacklist:".len() + 64);
    assert_eq!(key, RevocationStore::key_for("Bearer abc.def.ghi"));
}

#[tokio::test]
async fn test_zero_ttl_writes_nothing() {
    let memory = MemoryStore::new();
    let revocation = revocation_over(Arc::new(memory.clone()), RevocationFailurePolicy::FailClosed);

    revocation.revoke("expired", Duration::ZERO).await.unwrap();
    assert!(!revocation.revoke_once("expired", Duration::ZERO).await.unwrap());
    assert_eq!(memory.entry_count().await, 0);
}

#[tokio::test]
async fn test_revoke_once_admits_a_single_caller() {
    let revocation = revocation_over(Arc::new(MemoryStore::new()), RevocationFailurePolicy::FailClosed);
    let ttl = Duration::from_secs(60);

    assert!(revocation.revoke_once("refresh-1", ttl).await.unwrap());
    assert!(!revocation.revoke_once("refresh-1", ttl).await.unwrap());
    assert!(revocation.is_revoked("refresh-1").await.unwrap());
}

#[tokio::test]
async fn test_revoke_propagates_store_failure() {
    for policy in [RevocationFailurePolicy::FailClosed, RevocationFailurePolicy::FailOpen] {
        let revocation = revocation_over(Arc::new(UnavailableStore), policy);
        let result = revocation.revoke("token", Duration::from_secs(30)).await;
        assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    }
}

#[tokio::test]
async fn test_lookup_failure_fails_closed() {
    let revocation = revocation_over(Arc::new(UnavailableStore), RevocationFailurePolicy::FailClosed);
    let result = revocation.is_revoked("token").await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}

#[tokio::test]
async fn test_lookup_failure_fails_open_when_configured() {
    let revocation = revocation_over(Arc::new(UnavailableStore), RevocationFailurePolicy::FailOpen);
    assert!(!revocation.is_revoked("token").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_stalled_store_hits_deadline() {
    let revocation = revocation_over(Arc::new(StalledStore), RevocationFailurePolicy::FailClosed);

    let lookup = revocation.is_revoked("token").await;
    assert!(matches!(lookup, Err(DomainError::StoreUnavailable { .. })));

    let write = revocation.revoke("token", Duration::from_secs(10)).await;
    assert!(matches!(write, Err(DomainError::StoreUnavailable { .. })));
}
