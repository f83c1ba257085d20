//! Contract of the shared key-value store behind revocation and rate limiting

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the shared store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of a bounded fixed-window increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Counter value after the operation
    pub count: u64,
    /// Time left in the current window
    pub ttl: Duration,
    /// False when the counter was already at the limit and left untouched
    pub incremented: bool,
}

/// Shared key-value store with TTL support.
///
/// Every operation is a potential network round trip. Implementations must
/// make `set_if_absent` and `increment_within_limit` atomic across all
/// processes sharing the store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Write `value` only if `key` does not exist. Returns whether this call created it.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Remaining lifetime, `None` if the key is missing or has no expiry
    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError>;

    /// Returns whether a key was removed
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Increment the counter at `key` unless it already reached `limit`.
    ///
    /// A missing counter is created at 1 with `window` as its TTL. The TTL of
    /// an existing counter is never extended, and a counter at the limit is
    /// returned as is with `incremented == false`.
    async fn increment_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<WindowCount, StoreError>;
}
