//! Redis-backed shared store
//!
//! [`RedisClient`] wraps a multiplexed connection with retry logic;
//! [`RedisStore`] adapts it to the [`sg_core::KeyValueStore`] contract.

pub mod redis_client;
pub mod redis_store;


pub use redis_client::RedisClient;
pub use redis_store::RedisStore;

pub use sg_shared::config::CacheConfig;
