//! Redis client with connection retry and millisecond-precision expiry
//!
//! Commands run through [`RedisClient::execute_with_retry`], which retries
//! transient failures with exponential backoff. `SET NX` is sent once: a
//! replay after a lost reply would report the caller's own write as taken. The bounded counter
//! used by the rate guard is a single Lua script so that the read, the limit
//! check and the increment happen in one atomic step on the server.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use sg_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the retry backoff
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// KEYS[1] counter, ARGV[1] limit, ARGV[2] window in ms.
/// Returns {count, pttl_ms, incremented}.
const BOUNDED_INCREMENT_SCRIPT: &str = r#"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
local limit = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
if current >= limit then
  local ttl = redis.call('PTTL', KEYS[1])
  if ttl < 0 then
    if current > 0 then
      redis.call('PEXPIRE', KEYS[1], window)
    end
    ttl = window
  end
  return {current, ttl, 0}
end
local count = redis.call('INCR', KEYS[1])
local ttl = redis.call('PTTL', KEYS[1])
if count == 1 or ttl < 0 then
  redis.call('PEXPIRE', KEYS[1], window)
  ttl = window
end
return {count, ttl, 1}
"#;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Result of the bounded increment script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedCount {
    pub count: u64,
    pub ttl_ms: u64,
    pub incremented: bool,
}

/// Redis client over a multiplexed connection
#[derive(Clone)]
pub struct RedisClient {
    connection: MultiplexedConnection,
    config: CacheConfig,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
    bounded_increment: Script,
}

impl RedisClient {
    /// Connect using the retry settings from `config`
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Self::new_with_retry_delay(config, 100).await
    }

    pub async fn new_with_retry_delay(
        config: CacheConfig,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::create_connection_with_retry(&client, &config, retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            retry_delay_ms,
            bounded_increment: Script::new(BOUNDED_INCREMENT_SCRIPT),
        })
    }

    async fn create_connection_with_retry(
        client: &Client,
        config: &CacheConfig,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let max_attempts = config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let outcome = match tokio::time::timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(RedisError::from(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connection attempt timed out",
                ))),
            };

            match outcome {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Key as stored on the server, with the configured prefix applied
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// SET with a millisecond expiry
    pub async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), InfrastructureError> {
        let key = self.key(key);
        let value = value.to_string();
        let ttl_ms = expiry_millis(ttl);
        debug!("Setting key '{}' with expiry {}ms", key, ttl_ms);

        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            let value = value.clone();
            Box::pin(async move {
                redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("PX")
                    .arg(ttl_ms)
                    .query_async::<_, ()>(&mut conn)
                    .await
            })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// SET NX with a millisecond expiry. Returns whether the key was written.
    ///
    /// Not retried; a transient failure surfaces to the caller.
    pub async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        let value = value.to_string();
        let ttl_ms = expiry_millis(ttl);

        let reply = self
            .execute_with_attempts(attempt_limit(self.config.max_retries, false), move |mut conn| {
                let key = key.clone();
                let value = value.clone();
                Box::pin(async move {
                    redis::cmd("SET")
                        .arg(key)
                        .arg(value)
                        .arg("NX")
                        .arg("PX")
                        .arg(ttl_ms)
                        .query_async::<_, Option<String>>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(reply.is_some())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key = self.key(key);
        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        self.execute_with_retry(move |mut conn| {
            let key = key.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(InfrastructureError::Cache)
    }

    /// Remaining lifetime; `None` when the key is missing or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<Duration>, InfrastructureError> {
        let key = self.key(key);
        let pttl = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { redis::cmd("PTTL").arg(key).query_async::<_, i64>(&mut conn).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(u64::try_from(pttl).ok().map(Duration::from_millis))
    }

    /// Returns whether a key was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key = self.key(key);
        let removed = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(removed > 0)
    }

    /// Increment the counter at `key` unless it already reached `limit`.
    ///
    /// A lost reply on a retried attempt can count the same request twice;
    /// the window still closes on schedule.
    pub async fn increment_within_limit(
        &self,
        key: &str,
        limit: u64,
        window: Duration,
    ) -> Result<BoundedCount, InfrastructureError> {
        let key = self.key(key);
        let window_ms = expiry_millis(window);
        let script = self.bounded_increment.clone();

        let (count, ttl_ms, incremented) = self
            .execute_with_retry(move |mut conn| {
                let key = key.clone();
                let script = script.clone();
                Box::pin(async move {
                    script
                        .key(key)
                        .arg(limit)
                        .arg(window_ms)
                        .invoke_async::<_, (i64, i64, i64)>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(InfrastructureError::Cache)?;

        Ok(BoundedCount {
            count: u64::try_from(count).unwrap_or(0),
            ttl_ms: u64::try_from(ttl_ms).unwrap_or(window_ms),
            incremented: incremented == 1,
        })
    }

    /// PING the server
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        self.execute_with_attempts(attempt_limit(self.config.max_retries, true), operation)
            .await
    }

    async fn execute_with_attempts<F, T>(&self, max_attempts: u32, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_attempts && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Attempts allowed for one command. Commands that are not safe to replay
/// get exactly one.
pub(crate) fn attempt_limit(max_retries: u32, replay_safe: bool) -> u32 {
    if replay_safe {
        max_retries.max(1)
    } else {
        1
    }
}

/// Redis rejects a zero PX, so anything shorter rounds up to one millisecond
pub(crate) fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Transient errors worth another attempt
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError | redis::ErrorKind::BusyLoadingError | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(proto_end), Some(at_pos)) if at_pos > proto_end => {
            format!("{}****{}", &url[..proto_end + 3], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}
