//! Redis rate limit store.
//!
//! Uses Redis so counters are shared across every worker process. Requires
//! the `redis` feature.

use crate::error::{RateLimitError, RateLimitResult};
use crate::stores::RateLimitStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{debug, trace};

/// Redis-backed fixed-window counter store.
pub struct RedisStore {
    conn: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    /// Connect to Redis at `url`.
    pub async fn new(url: &str) -> RateLimitResult<Self> {
        debug!(url = %url, "Connecting to Redis for rate limiting");

        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self {
            conn,
            prefix: "outbox:ratelimit".to_string(),
        })
    }

    /// Connect to Redis, tagging this store with a label for diagnostics.
    /// Callers build fully-qualified keys themselves (see
    /// [`crate::RateLimiter`]), so this does not affect the keys read or
    /// written — only what [`RedisStore`]'s `Debug` impl reports.
    pub async fn with_prefix(url: &str, prefix: impl Into<String>) -> RateLimitResult<Self> {
        let mut store = Self::new(url).await?;
        store.prefix = prefix.into();
        Ok(store)
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn increment(&self, key: &str, ttl: Duration) -> RateLimitResult<u64> {
        trace!(key = %key, "Redis counter increment");

        // INCR then EXPIRE-if-new must be atomic or a counter that should
        // expire could live forever after a crash between the two calls.
        let script = redis::Script::new(
            r#"
            local key = KEYS[1]
            local ttl = tonumber(ARGV[1])
            local count = redis.call('INCR', key)
            if count == 1 then
                redis.call('EXPIRE', key, ttl)
            end
            return count
            "#,
        );

        let mut conn = self.conn.clone();
        let count: u64 = script
            .key(key)
            .arg(ttl.as_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::store(e.to_string()))?;

        Ok(count)
    }

    async fn get(&self, key: &str) -> RateLimitResult<u64> {
        let mut conn = self.conn.clone();
        let count: Option<u64> = conn.get(key).await.map_err(|e| RateLimitError::store(e.to_string()))?;
        Ok(count.unwrap_or(0))
    }

    async fn reset(&self, key: &str) -> RateLimitResult<()> {
        debug!(key = %key, "Resetting rate limit counter in Redis");
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(|e| RateLimitError::store(e.to_string()))?;
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "redis"
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore").field("prefix", &self.prefix).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_increment_and_get() {
        let store = RedisStore::new("redis://localhost:6379").await.unwrap();
        store.reset("test").await.unwrap();

        assert_eq!(store.increment("test", Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(store.increment("test", Duration::from_secs(60)).await.unwrap(), 2);
        assert_eq!(store.get("test").await.unwrap(), 2);
    }
}
