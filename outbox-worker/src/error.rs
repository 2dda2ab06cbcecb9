//! Error types and per-dispatch outcomes for the worker pool.

use thiserror::Error;

/// Result type for worker pool operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors the worker pool itself can raise (as opposed to outcomes of a
/// single dispatch, which are [`DispatchOutcome`] — a rate-limit deferral
/// or a transport failure is not a bug in the worker, it's an expected
/// branch of §4.D).
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("job store error: {0}")]
    Store(#[from] outbox_store::StoreError),

    #[error("delay queue error: {0}")]
    Queue(#[from] outbox_queue::QueueError),

    #[error("rate limiter error: {0}")]
    RateLimit(#[from] outbox_ratelimit::RateLimitError),

    #[error("mail transport error: {0}")]
    Mail(#[from] outbox_mail::MailError),
}

/// Outcome of processing a single queue entry end-to-end (spec §4.D / §7).
/// Every branch here is acknowledged at the queue level as handled — only
/// [`DispatchOutcome::TransportFailure`] feeds the queue's own retry
/// machinery; nothing is silently dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The job store had no record for this entry's payload. Acknowledged
    /// as handled; nothing more to do.
    NotFound,
    /// The record was already `Sent`. Idempotency gate caught a replay.
    AlreadySent,
    /// Rate cap reached; a fresh queue entry was enqueued with the
    /// computed `retry_after_ms`. The store record stays `Scheduled`.
    RateLimited { retry_after_ms: u64 },
    /// The send succeeded; the record is now `Sent` and the rate counters
    /// were incremented.
    Sent { message_id: String },
    /// The SMTP transport returned an error; the record is now `Failed`
    /// and the queue's own backoff will retry the entry in place (or
    /// dead-letter it once `retry_limit` is exhausted).
    TransportFailure { error: String },
}
