//! [`KeyValueStore`] backed by Redis

use async_trait::async_trait;
use std::time::Duration;

use sg_core::{KeyValueStore, StoreError, WindowCount};

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Shared store for every server instance pointed at the same Redis
#[derive(Clone)]
pub struct RedisStore {
    client: RedisClient,
}

impl RedisStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.client.get(key).await?)
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        Ok(self.client.set_with_expiry(key, value, ttl).await?)
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        Ok(self.client.set_if_absent(key, value, ttl).await?)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.exists(key).await?)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        Ok(self.client.ttl(key).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.client.delete(key).await?)
    }

    async fn increment_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<WindowCount, StoreError> {
        let counted = self.client.increment_within_limit(key, limit, window).await?;
        Ok(WindowCount {
            count: counted.count,
            ttl: Duration::from_millis(counted.ttl_ms),
            incremented: counted.incremented,
        })
    }
}
