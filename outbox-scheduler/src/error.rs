//! Error types for the scheduler API and startup recovery.

use thiserror::Error;

/// Result type for scheduler operations.
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler and recovery errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("job store error: {0}")]
    Store(#[from] outbox_store::StoreError),

    #[error("delay queue error: {0}")]
    Queue(#[from] outbox_queue::QueueError),

    /// `ScheduleBulk` called with an empty recipient list. Surfaced by the
    /// façade as a 400 with no store writes, per spec §8.
    #[error("bulk schedule request has no recipients")]
    EmptyRecipients,
}
