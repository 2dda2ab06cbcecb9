//! In-memory rate limit store.
//!
//! Uses DashMap for thread-safe concurrent access. Suitable for
//! single-instance deployments or tests. For shared deployments, use
//! [`crate::stores::RedisStore`].

use crate::error::RateLimitResult;
use crate::stores::RateLimitStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A counter and the instant it expires at.
#[derive(Debug, Clone)]
struct Counter {
    count: u64,
    expires_at: Instant,
}

/// In-memory fixed-window counter store.
pub struct MemoryStore {
    counters: DashMap<String, Counter>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        debug!("Creating new in-memory rate limit store");
        Self {
            counters: DashMap::new(),
        }
    }

    /// Number of tracked keys (for monitoring).
    pub fn key_count(&self) -> usize {
        self.counters.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for MemoryStore {
    async fn increment(&self, key: &str, ttl: Duration) -> RateLimitResult<u64> {
        let now = Instant::now();

        let mut entry = self.counters.entry(key.to_string()).or_insert_with(|| Counter {
            count: 0,
            expires_at: now + ttl,
        });

        if now >= entry.expires_at {
            entry.count = 0;
            entry.expires_at = now + ttl;
        }

        entry.count += 1;
        trace!(key = %key, count = entry.count, "Memory store: incremented");
        Ok(entry.count)
    }

    async fn get(&self, key: &str) -> RateLimitResult<u64> {
        let now = Instant::now();
        match self.counters.get(key) {
            Some(entry) if now < entry.expires_at => Ok(entry.count),
            _ => Ok(0),
        }
    }

    async fn reset(&self, key: &str) -> RateLimitResult<()> {
        debug!(key = %key, "Resetting rate limit counter");
        self.counters.remove(key);
        Ok(())
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn increments_and_returns_running_count() {
        let store = MemoryStore::new();
        assert_eq!(store.increment("k", Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(store.increment("k", Duration::from_secs(60)).await.unwrap(), 2);
        assert_eq!(store.increment("k", Duration::from_secs(60)).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn get_returns_zero_for_unknown_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reset_clears_the_counter() {
        let store = MemoryStore::new();
        store.increment("k", Duration::from_secs(60)).await.unwrap();
        store.reset("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn counters_for_different_keys_are_independent() {
        let store = MemoryStore::new();
        store.increment("a", Duration::from_secs(60)).await.unwrap();
        store.increment("a", Duration::from_secs(60)).await.unwrap();
        store.increment("b", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), 2);
        assert_eq!(store.get("b").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn expired_counter_resets_on_next_increment() {
        let store = MemoryStore::new();
        store.increment("k", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.increment("k", Duration::from_secs(60)).await.unwrap(), 1);
    }
}
