//! Redis-backed delay queue.
//!
//! Entries sit in a `delayed` sorted set keyed by their ready time until that
//! time passes, at which point [`DelayQueue::dequeue`] promotes them into a
//! FIFO `ready` sorted set and pops the oldest one. This mirrors the
//! move-then-pop pattern this crate used to run across several priority
//! queues, collapsed down to the single queue OutBox needs.

use crate::entry::{JobKey, QueueEntry};
use crate::error::{QueueError, QueueResult};
use chrono::Utc;
use outbox_log::{debug, info, warn};
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;

/// Delay queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis connection URL.
    pub redis_url: String,

    /// Key prefix for Redis keys.
    pub key_prefix: String,

    /// Retention time for an entry's payload record before it ages out.
    pub retention_time: Duration,
}

impl QueueConfig {
    /// Create a new queue configuration.
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            key_prefix: "outbox:queue".to_string(),
            retention_time: Duration::from_secs(86_400),
        }
    }

    /// Set the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the retention time for an entry's payload record.
    pub fn with_retention_time(mut self, retention_time: Duration) -> Self {
        self.retention_time = retention_time;
        self
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}:{}", self.key_prefix, suffix)
    }

    fn entry_key(&self, job_key: &str) -> String {
        self.key(&format!("entry:{}", job_key))
    }
}

/// Outcome of a transport-failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOutcome {
    /// The entry will be retried after the given backoff.
    Retried { attempt: u32, retry_at_ms: i64 },
    /// The entry has exhausted its retry budget and moved to the dead set.
    DeadLettered,
}

/// A durable, delayed job queue backed by Redis sorted sets.
#[derive(Clone)]
pub struct DelayQueue {
    connection: ConnectionManager,
    config: QueueConfig,
}

impl DelayQueue {
    /// Connect using default configuration.
    pub async fn new(redis_url: impl Into<String>) -> QueueResult<Self> {
        Self::with_config(QueueConfig::new(redis_url)).await
    }

    /// Connect using custom configuration.
    pub async fn with_config(config: QueueConfig) -> QueueResult<Self> {
        info!("Connecting delay queue to Redis");
        let client =
            Client::open(config.redis_url.as_str()).map_err(|e| QueueError::Config(e.to_string()))?;
        let connection = ConnectionManager::new(client).await?;
        info!("Delay queue ready, prefix={}", config.key_prefix);
        Ok(Self { connection, config })
    }

    /// Enqueue a new entry. `delay_ms` is clamped to 0 (never scheduled in
    /// the past). `retry_limit` bounds transport-failure retries handled
    /// internally by [`DelayQueue::mark_failed`].
    pub async fn enqueue(
        &self,
        job_key: impl Into<String>,
        payload: serde_json::Value,
        delay_ms: i64,
        retry_limit: u32,
    ) -> QueueResult<()> {
        let job_key = job_key.into();
        let delay_ms = delay_ms.max(0);
        let ready_at = Utc::now() + chrono::Duration::milliseconds(delay_ms);
        let entry = QueueEntry::new(job_key.clone(), payload, ready_at, retry_limit);

        debug!("Enqueueing delay queue entry job_key={} delay_ms={}", job_key, delay_ms);
        self.save_entry(&entry).await?;

        let mut conn = self.connection.clone();
        if entry.is_ready() {
            let _: () = conn
                .zadd(self.config.key("ready"), &job_key, entry.created_at.timestamp_millis())
                .await?;
        } else {
            let _: () = conn
                .zadd(self.config.key("delayed"), &job_key, ready_at.timestamp_millis())
                .await?;
        }

        Ok(())
    }

    /// Dequeue the next ready entry, if any, marking it as processing.
    pub async fn dequeue(&self) -> QueueResult<Option<QueueEntry>> {
        self.promote_ready_entries().await?;

        let mut conn = self.connection.clone();
        let ready_key = self.config.key("ready");
        let popped: Option<Vec<(String, f64)>> = conn.zpopmin(&ready_key, 1).await?;

        let Some(items) = popped else { return Ok(None) };
        let Some((job_key, _score)) = items.into_iter().next() else {
            return Ok(None);
        };

        let Some(entry) = self.get_entry(&job_key).await? else {
            return Ok(None);
        };

        let processing_key = self.config.key("processing");
        let _: () = conn
            .zadd(&processing_key, &job_key, Utc::now().timestamp_millis())
            .await?;

        Ok(Some(entry))
    }

    /// Whether an entry with this job key currently exists in the queue.
    pub async fn exists(&self, job_key: &str) -> QueueResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(self.config.entry_key(job_key)).await?;
        Ok(exists)
    }

    /// Acknowledge successful dispatch: remove the entry entirely.
    pub async fn mark_completed(&self, job_key: &str) -> QueueResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(self.config.entry_key(job_key)).await?;
        self.remove_from_processing(job_key).await?;
        debug!("Delay queue entry completed job_key={}", job_key);
        Ok(())
    }

    /// Report a transport failure. Reuses `job_key` and applies the queue's
    /// exponential backoff, or dead-letters the entry once `retry_limit` is
    /// exhausted. Distinct from a rate-limit deferral, which the caller
    /// implements as `mark_completed` followed by a fresh `enqueue` under a
    /// synthesized retry key.
    pub async fn mark_failed(&self, job_key: &str, error: impl Into<String>) -> QueueResult<FailOutcome> {
        let error = error.into();
        let mut entry = self
            .get_entry(job_key)
            .await?
            .ok_or_else(|| QueueError::EntryNotFound(job_key.to_string()))?;

        self.remove_from_processing(job_key).await?;

        if entry.can_retry() {
            entry.attempts += 1;
            let retry_at = Utc::now() + entry.backoff_delay();
            entry.ready_at = retry_at;
            self.save_entry(&entry).await?;

            let mut conn = self.connection.clone();
            let _: () = conn
                .zadd(self.config.key("delayed"), job_key, retry_at.timestamp_millis())
                .await?;

            warn!("Queue entry failed, scheduled retry job_key={} attempt={} error={}", job_key, entry.attempts, error);
            Ok(FailOutcome::Retried {
                attempt: entry.attempts,
                retry_at_ms: retry_at.timestamp_millis(),
            })
        } else {
            let mut conn = self.connection.clone();
            let _: () = conn
                .zadd(self.config.key("dead"), job_key, Utc::now().timestamp_millis())
                .await?;

            warn!("Queue entry exhausted retries, dead-lettered job_key={} error={}", job_key, error);
            Ok(FailOutcome::DeadLettered)
        }
    }

    /// Number of entries awaiting dispatch (ready + delayed).
    pub async fn size(&self) -> QueueResult<usize> {
        let mut conn = self.connection.clone();
        let ready: usize = conn.zcard(self.config.key("ready")).await?;
        let delayed: usize = conn.zcard(self.config.key("delayed")).await?;
        Ok(ready + delayed)
    }

    /// Clear all entries belonging to this queue. Test-only escape hatch.
    pub async fn clear(&self) -> QueueResult<()> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}:*", self.config.key_prefix);
        let keys: Vec<String> = conn.keys(&pattern).await?;
        if !keys.is_empty() {
            let _: () = conn.del(keys).await?;
        }
        Ok(())
    }

    async fn promote_ready_entries(&self) -> QueueResult<()> {
        let mut conn = self.connection.clone();
        let delayed_key = self.config.key("delayed");
        let now = Utc::now().timestamp_millis();

        let job_keys: Vec<JobKey> = conn.zrangebyscore(&delayed_key, "-inf", now).await?;

        for job_key in job_keys {
            let _: () = conn.zrem(&delayed_key, &job_key).await?;
            let _: () = conn
                .zadd(self.config.key("ready"), &job_key, Utc::now().timestamp_millis())
                .await?;
        }

        Ok(())
    }

    async fn remove_from_processing(&self, job_key: &str) -> QueueResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.zrem(self.config.key("processing"), job_key).await?;
        Ok(())
    }

    async fn save_entry(&self, entry: &QueueEntry) -> QueueResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(entry).map_err(|e| QueueError::Serialization(e.to_string()))?;
        let _: () = conn
            .set_ex(self.config.entry_key(&entry.job_key), json, self.config.retention_time.as_secs())
            .await?;
        Ok(())
    }

    async fn get_entry(&self, job_key: &str) -> QueueResult<Option<QueueEntry>> {
        let mut conn = self.connection.clone();
        let json: Option<String> = conn.get(self.config.entry_key(job_key)).await?;
        match json {
            Some(json) => {
                let entry = serde_json::from_str(&json).map_err(|e| QueueError::Deserialization(e.to_string()))?;
                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = QueueConfig::new("redis://localhost:6379");
        assert_eq!(config.key_prefix, "outbox:queue");
        assert_eq!(config.retention_time, Duration::from_secs(86_400));
    }

    #[test]
    fn config_builder() {
        let config = QueueConfig::new("redis://localhost:6379")
            .with_key_prefix("test:queue")
            .with_retention_time(Duration::from_secs(3600));

        assert_eq!(config.key_prefix, "test:queue");
        assert_eq!(config.retention_time, Duration::from_secs(3600));
    }

    #[test]
    fn entry_key_includes_prefix_and_job_key() {
        let config = QueueConfig::new("redis://localhost:6379").with_key_prefix("outbox:queue");
        assert_eq!(config.entry_key("job-1"), "outbox:queue:entry:job-1");
    }

    #[test]
    fn config_clone_is_independent() {
        let config1 = QueueConfig::new("redis://localhost:6379");
        let config2 = config1.clone().with_key_prefix("other");
        assert_ne!(config1.key_prefix, config2.key_prefix);
    }
}
