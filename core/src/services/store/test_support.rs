//! Store doubles for outage tests

use async_trait::async_trait;
use std::time::Duration;

use super::traits::{KeyValueStore, StoreError, WindowCount};

/// Every call fails immediately, like a refused connection
pub struct UnavailableStore;

/// Every call hangs until the caller's deadline fires
pub struct StalledStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(refused())
    }
    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), StoreError> {
        Err(refused())
    }
    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool, StoreError> {
        Err(refused())
    }
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        Err(refused())
    }
    async fn ttl(&self, _key: &str) -> Result<Option<Duration>, StoreError> {
        Err(refused())
    }
    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        Err(refused())
    }
    async fn increment_within_limit(
        &self,
        _key: &str,
        _limit: u64,
        _window: Duration,
    ) -> Result<WindowCount, StoreError> {
        Err(refused())
    }
}

fn refused() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

async fn stall<T>() -> Result<T, StoreError> {
    std::future::pending::<()>().await;
    Err(StoreError::Unavailable("unreachable".to_string()))
}

#[async_trait]
impl KeyValueStore for StalledStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        stall().await
    }
    async fn set_with_expiry(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), StoreError> {
        stall().await
    }
    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool, StoreError> {
        stall().await
    }
    async fn exists(&self, _key: &str) -> Result<bool, StoreError> {
        stall().await
    }
    async fn ttl(&self, _key: &str) -> Result<Option<Duration>, StoreError> {
        stall().await
    }
    async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
        stall().await
    }
    async fn increment_within_limit(
        &self,
        _key: &str,
        _limit: u64,
        _window: Duration,
    ) -> Result<WindowCount, StoreError> {
        stall().await
    }
}
