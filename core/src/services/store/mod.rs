//! Shared key-value store abstraction
//!
//! Revocation and rate limiting both sit on top of [`KeyValueStore`], so
//! every server instance pointed at the same store sees the same state.

mod memory;
mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use memory::MemoryStore;
pub use traits::{KeyValueStore, StoreError, WindowCount};

use std::future::Future;
use std::time::Duration;

/// Run a store operation under `deadline`, turning an elapsed deadline into
/// [`StoreError::Timeout`].
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
