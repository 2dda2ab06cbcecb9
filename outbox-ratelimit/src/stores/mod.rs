//! Rate limit storage backends.
//!
//! - **Memory**: in-process storage using DashMap (default, single-instance)
//! - **Redis**: shared storage for multi-instance deployments

mod memory;
#[cfg(feature = "redis")]
mod redis;

pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis::RedisStore;

use crate::error::RateLimitResult;
use async_trait::async_trait;
use std::time::Duration;

/// Store type for rate limiting.
#[derive(Debug, Clone, Default)]
pub enum StoreType {
    /// In-memory store (single instance only).
    #[default]
    Memory,
    /// Redis store (shared across instances).
    Redis,
}

/// Fixed-hourly-window counter storage.
///
/// Every counter is scoped to a caller-chosen key (a sender or the global
/// scope, each salted with the current hour bucket) so the backend never
/// needs to know about windows itself — it just counts and expires.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Atomically increment the counter for `key` and return the new count.
    /// The first increment for a key sets it to expire after `ttl`.
    async fn increment(&self, key: &str, ttl: Duration) -> RateLimitResult<u64>;

    /// Current count for `key`, or 0 if absent or expired.
    async fn get(&self, key: &str) -> RateLimitResult<u64>;

    /// Clear the counter for `key`.
    async fn reset(&self, key: &str) -> RateLimitResult<()>;

    /// Get store type name for debugging.
    fn store_type(&self) -> &'static str;
}
