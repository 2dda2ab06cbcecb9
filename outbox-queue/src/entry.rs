//! Delay queue entry definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque queue entry identifier, matching the email job it carries except
/// when a rate-limit deferral mints a derived retry key (`"<id>-retry-<ns>"`).
pub type JobKey = String;

/// Payload carried by a queue entry: enough to look the source record back
/// up in the job store without duplicating its fields here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDispatchPayload {
    /// Identifier of the `EmailJob` record this entry will dispatch.
    pub email_job_id: uuid::Uuid,
}

/// An entry sitting in the delay queue, waiting for its `ready_at` time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Unique key for this entry.
    pub job_key: JobKey,

    /// Opaque payload, deserialized by the worker pool.
    pub payload: serde_json::Value,

    /// Earliest time this entry may be dequeued.
    pub ready_at: DateTime<Utc>,

    /// Number of transport-failure retries attempted so far.
    pub attempts: u32,

    /// Maximum number of transport-failure retries before dead-lettering.
    pub retry_limit: u32,

    /// When this entry was enqueued.
    pub created_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Create a new entry ready at `ready_at` (negative delays should be
    /// clamped to "now" by the caller before constructing this).
    pub fn new(
        job_key: impl Into<String>,
        payload: serde_json::Value,
        ready_at: DateTime<Utc>,
        retry_limit: u32,
    ) -> Self {
        Self {
            job_key: job_key.into(),
            payload,
            ready_at,
            attempts: 0,
            retry_limit,
            created_at: Utc::now(),
        }
    }

    /// Whether this entry's `ready_at` has passed.
    pub fn is_ready(&self) -> bool {
        Utc::now() >= self.ready_at
    }

    /// Whether another transport-failure retry is still allowed.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.retry_limit
    }

    /// Exponential backoff before the next transport-failure retry:
    /// base 1s, doubling per attempt, capped at 1 hour.
    pub fn backoff_delay(&self) -> chrono::Duration {
        let seconds = 2_i64.pow(self.attempts.min(20));
        chrono::Duration::seconds(seconds.min(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> serde_json::Value {
        serde_json::json!({ "email_job_id": uuid::Uuid::new_v4() })
    }

    #[test]
    fn entry_ready_in_the_past_is_ready() {
        let entry = QueueEntry::new("job-1", payload(), Utc::now() - chrono::Duration::seconds(5), 3);
        assert!(entry.is_ready());
    }

    #[test]
    fn entry_ready_in_the_future_is_not_ready() {
        let entry = QueueEntry::new("job-1", payload(), Utc::now() + chrono::Duration::hours(1), 3);
        assert!(!entry.is_ready());
    }

    #[test]
    fn backoff_grows_exponentially_and_caps() {
        let mut entry = QueueEntry::new("job-1", payload(), Utc::now(), 10);
        entry.attempts = 0;
        assert_eq!(entry.backoff_delay(), chrono::Duration::seconds(1));
        entry.attempts = 1;
        assert_eq!(entry.backoff_delay(), chrono::Duration::seconds(2));
        entry.attempts = 2;
        assert_eq!(entry.backoff_delay(), chrono::Duration::seconds(4));
        entry.attempts = 20;
        assert_eq!(entry.backoff_delay(), chrono::Duration::seconds(3600));
    }

    #[test]
    fn can_retry_respects_retry_limit() {
        let mut entry = QueueEntry::new("job-1", payload(), Utc::now(), 3);
        assert!(entry.can_retry());
        entry.attempts = 3;
        assert!(!entry.can_retry());
    }
}
