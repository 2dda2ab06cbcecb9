//! Rate limiter configuration and builder.

use crate::RateLimiter;
use crate::error::{RateLimitError, RateLimitResult};
use crate::stores::{MemoryStore, RateLimitStore, StoreType};
use std::sync::Arc;
use tracing::debug;

/// Configuration for the rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum emails a single sender may dispatch within a rolling hour.
    pub max_per_sender_per_hour: u64,
    /// Maximum emails across all senders within a rolling hour.
    pub max_global_per_hour: u64,
    /// Store type (memory, redis).
    pub store_type: StoreType,
    /// Key prefix for storage.
    pub key_prefix: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_sender_per_hour: 100,
            max_global_per_hour: 10_000,
            store_type: StoreType::Memory,
            key_prefix: "outbox:ratelimit".to_string(),
        }
    }
}

impl RateLimitConfig {
    /// Create a new configuration builder.
    pub fn builder() -> RateLimiterBuilder {
        RateLimiterBuilder::new()
    }
}

/// Builder for creating a [`RateLimiter`].
pub struct RateLimiterBuilder {
    max_per_sender_per_hour: Option<u64>,
    max_global_per_hour: Option<u64>,
    store_type: StoreType,
    key_prefix: String,
    #[cfg(feature = "redis")]
    redis_url: Option<String>,
}

impl RateLimiterBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            max_per_sender_per_hour: None,
            max_global_per_hour: None,
            store_type: StoreType::Memory,
            key_prefix: "outbox:ratelimit".to_string(),
            #[cfg(feature = "redis")]
            redis_url: None,
        }
    }

    /// Set the per-sender hourly cap.
    pub fn max_per_sender_per_hour(mut self, max: u64) -> Self {
        self.max_per_sender_per_hour = Some(max);
        self
    }

    /// Set the global hourly cap.
    pub fn max_global_per_hour(mut self, max: u64) -> Self {
        self.max_global_per_hour = Some(max);
        self
    }

    /// Use an in-memory store (default).
    pub fn memory_store(mut self) -> Self {
        self.store_type = StoreType::Memory;
        self
    }

    /// Use a Redis store for shared rate limiting.
    #[cfg(feature = "redis")]
    pub fn redis_store(mut self, url: &str) -> Self {
        self.store_type = StoreType::Redis;
        self.redis_url = Some(url.to_string());
        self
    }

    /// Set the key prefix for storage.
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Build the rate limiter.
    pub async fn build(self) -> RateLimitResult<RateLimiter> {
        let max_per_sender_per_hour = self
            .max_per_sender_per_hour
            .ok_or_else(|| RateLimitError::config("max_per_sender_per_hour must be specified"))?;
        let max_global_per_hour = self
            .max_global_per_hour
            .ok_or_else(|| RateLimitError::config("max_global_per_hour must be specified"))?;

        debug!(
            max_per_sender_per_hour,
            max_global_per_hour,
            store_type = ?self.store_type,
            "Building rate limiter"
        );

        let config = RateLimitConfig {
            max_per_sender_per_hour,
            max_global_per_hour,
            store_type: self.store_type.clone(),
            key_prefix: self.key_prefix.clone(),
        };

        let store: Arc<dyn RateLimitStore> = match self.store_type {
            StoreType::Memory => Arc::new(MemoryStore::new()),
            #[cfg(feature = "redis")]
            StoreType::Redis => {
                let url = self
                    .redis_url
                    .ok_or_else(|| RateLimitError::config("Redis URL must be specified for Redis store"))?;
                Arc::new(crate::stores::RedisStore::new(&url).await?)
            }
            #[cfg(not(feature = "redis"))]
            StoreType::Redis => {
                return Err(RateLimitError::config(
                    "Redis feature is not enabled. Add `redis` feature to use Redis store.",
                ));
            }
        };

        Ok(RateLimiter::new(store, config))
    }
}

impl Default for RateLimiterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_per_sender_per_hour, 100);
        assert!(matches!(config.store_type, StoreType::Memory));
    }

    #[tokio::test]
    async fn test_builder_basic() {
        let limiter = RateLimiterBuilder::new()
            .max_per_sender_per_hour(50)
            .max_global_per_hour(500)
            .key_prefix("test")
            .build()
            .await
            .unwrap();

        assert_eq!(limiter.config().max_per_sender_per_hour, 50);
        assert_eq!(limiter.config().max_global_per_hour, 500);
    }

    #[tokio::test]
    async fn test_builder_missing_limits() {
        let result = RateLimiterBuilder::new().build().await;
        assert!(result.is_err());
    }
}
