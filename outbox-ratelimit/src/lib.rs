//! # OutBox Rate Limiting
//!
//! Hierarchical hourly rate limiting for email dispatch: a per-sender cap
//! and a global cap, both on fixed wall-clock hour windows rather than a
//! rolling window.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use outbox_ratelimit::RateLimiter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = RateLimiter::builder()
//!     .max_per_sender_per_hour(100)
//!     .max_global_per_hour(10_000)
//!     .build()
//!     .await?;
//!
//! let decision = limiter.check("user-123").await?;
//! if decision.allowed {
//!     limiter.increment("user-123").await?;
//! } else {
//!     println!("deferred, retry in {}ms", decision.retry_after_ms);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Windowing
//!
//! The hour bucket is `floor(now_ms / 3_600_000)`, a fixed wall-clock hour
//! rather than a rolling window anchored to the first request. Counters
//! carry a two-hour TTL so they survive a little past the window that
//! produced them, then expire on their own.

pub mod config;
pub mod error;
pub mod stores;

pub use config::{RateLimitConfig, RateLimiterBuilder};
pub use error::{RateLimitError, RateLimitResult};
pub use stores::{MemoryStore, RateLimitStore, StoreType};

#[cfg(feature = "redis")]
pub use stores::RedisStore;

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

const HOUR_MS: i64 = 3_600_000;
const COUNTER_TTL: Duration = Duration::from_secs(7_200);

/// Which scope rejected a dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    /// The sender's own hourly cap was reached.
    Sender,
    /// The system-wide hourly cap was reached.
    Global,
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    /// Whether the dispatch may proceed.
    pub allowed: bool,
    /// Which scope blocked the attempt, if any.
    pub scope: Option<LimitScope>,
    /// Milliseconds until the current hour window rolls over, plus a
    /// one-second safety margin.
    pub retry_after_ms: u64,
}

impl RateLimitDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            scope: None,
            retry_after_ms: 0,
        }
    }

    fn denied(scope: LimitScope, retry_after_ms: u64) -> Self {
        Self {
            allowed: false,
            scope: Some(scope),
            retry_after_ms,
        }
    }
}

/// Hierarchical hourly rate limiter: sender cap, then global cap.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a new rate limiter builder.
    pub fn builder() -> RateLimiterBuilder {
        RateLimiterBuilder::new()
    }

    /// Create a new rate limiter with the given store and configuration.
    pub fn new(store: Arc<dyn RateLimitStore>, config: RateLimitConfig) -> Self {
        debug!(
            max_per_sender_per_hour = config.max_per_sender_per_hour,
            max_global_per_hour = config.max_global_per_hour,
            "Creating new rate limiter"
        );
        Self { store, config }
    }

    /// Check whether `user_id` may dispatch right now, without consuming
    /// any quota. Checks the sender scope first, then the global scope,
    /// matching the order the scheduler should apply deferrals in.
    pub async fn check(&self, user_id: &str) -> RateLimitResult<RateLimitDecision> {
        let now_ms = now_ms();
        let hour = hour_bucket(now_ms);
        trace!(user_id = %user_id, hour, "Checking rate limit");

        let sender_count = self.store.get(&self.sender_key(user_id, hour)).await?;
        if sender_count >= self.config.max_per_sender_per_hour {
            warn!(user_id = %user_id, sender_count, "Sender hourly limit reached");
            return Ok(RateLimitDecision::denied(LimitScope::Sender, ms_until_next_hour(now_ms)));
        }

        let global_count = self.store.get(&self.global_key(hour)).await?;
        if global_count >= self.config.max_global_per_hour {
            warn!(global_count, "Global hourly limit reached");
            return Ok(RateLimitDecision::denied(LimitScope::Global, ms_until_next_hour(now_ms)));
        }

        Ok(RateLimitDecision::allowed())
    }

    /// Record a dispatch attempt against both the sender and global
    /// counters for the current hour. Not atomic across the two keys: a
    /// request racing between another caller's `check` and `increment` can
    /// push a scope briefly over its limit before the next check sees it.
    pub async fn increment(&self, user_id: &str) -> RateLimitResult<()> {
        let hour = hour_bucket(now_ms());
        self.store.increment(&self.sender_key(user_id, hour), COUNTER_TTL).await?;
        self.store.increment(&self.global_key(hour), COUNTER_TTL).await?;
        Ok(())
    }

    /// Current sender and global counts for the present hour, without
    /// mutating anything. Useful for status/metrics endpoints.
    pub async fn status(&self, user_id: &str) -> RateLimitResult<(u64, u64)> {
        let hour = hour_bucket(now_ms());
        let sender_count = self.store.get(&self.sender_key(user_id, hour)).await?;
        let global_count = self.store.get(&self.global_key(hour)).await?;
        Ok((sender_count, global_count))
    }

    /// Reset the counters for `user_id`'s current hour. Test/ops escape hatch.
    pub async fn reset(&self, user_id: &str) -> RateLimitResult<()> {
        let hour = hour_bucket(now_ms());
        debug!(user_id = %user_id, "Resetting rate limit counters");
        self.store.reset(&self.sender_key(user_id, hour)).await?;
        self.store.reset(&self.global_key(hour)).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn sender_key(&self, user_id: &str, hour: i64) -> String {
        format!("{}:sender:{}:{}", self.config.key_prefix, user_id, hour)
    }

    fn global_key(&self, hour: i64) -> String {
        format!("{}:global:{}", self.config.key_prefix, hour)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").field("config", &self.config).finish()
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn hour_bucket(now_ms: i64) -> i64 {
    now_ms / HOUR_MS
}

fn ms_until_next_hour(now_ms: i64) -> u64 {
    let remainder = now_ms.rem_euclid(HOUR_MS);
    (HOUR_MS - remainder) as u64 + 1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_limit_denies_before_global_limit() {
        let limiter = RateLimiter::builder()
            .max_per_sender_per_hour(2)
            .max_global_per_hour(1000)
            .build()
            .await
            .unwrap();

        limiter.increment("user-1").await.unwrap();
        limiter.increment("user-1").await.unwrap();

        let decision = limiter.check("user-1").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.scope, Some(LimitScope::Sender));
    }

    #[tokio::test]
    async fn global_limit_denies_once_reached() {
        let limiter = RateLimiter::builder()
            .max_per_sender_per_hour(1000)
            .max_global_per_hour(2)
            .build()
            .await
            .unwrap();

        limiter.increment("user-1").await.unwrap();
        limiter.increment("user-2").await.unwrap();

        let decision = limiter.check("user-3").await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.scope, Some(LimitScope::Global));
    }

    #[tokio::test]
    async fn different_senders_have_independent_budgets() {
        let limiter = RateLimiter::builder()
            .max_per_sender_per_hour(1)
            .max_global_per_hour(1000)
            .build()
            .await
            .unwrap();

        limiter.increment("user-1").await.unwrap();
        assert!(!limiter.check("user-1").await.unwrap().allowed);
        assert!(limiter.check("user-2").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn reset_restores_the_budget() {
        let limiter = RateLimiter::builder()
            .max_per_sender_per_hour(1)
            .max_global_per_hour(1000)
            .build()
            .await
            .unwrap();

        limiter.increment("user-1").await.unwrap();
        assert!(!limiter.check("user-1").await.unwrap().allowed);

        limiter.reset("user-1").await.unwrap();
        assert!(limiter.check("user-1").await.unwrap().allowed);
    }

    #[test]
    fn hour_bucket_groups_by_wall_clock_hour() {
        let start_of_hour = 10 * HOUR_MS;
        assert_eq!(hour_bucket(start_of_hour), 10);
        assert_eq!(hour_bucket(start_of_hour + HOUR_MS - 1), 10);
        assert_eq!(hour_bucket(start_of_hour + HOUR_MS), 11);
    }

    #[test]
    fn ms_until_next_hour_counts_down_within_the_window() {
        let start_of_hour = 5 * HOUR_MS;
        assert_eq!(ms_until_next_hour(start_of_hour), HOUR_MS as u64 + 1_000);
        assert_eq!(ms_until_next_hour(start_of_hour + HOUR_MS - 1), 1_001);
    }
}
