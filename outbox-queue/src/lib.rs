//! Delay queue for OutBox's email dispatch pipeline.
//!
//! Provides a single durable, delayed queue backed by Redis:
//! - entries become visible to dequeuers once their `ready_at` passes
//! - transport failures retry in place with exponential backoff, up to a
//!   per-entry retry limit, after which the entry is dead-lettered
//!
//! # Examples
//!
//! ```no_run
//! use outbox_queue::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QueueError> {
//!     let queue = DelayQueue::new("redis://localhost:6379").await?;
//!
//!     queue.enqueue(
//!         "email-job-123",
//!         serde_json::json!({ "email_job_id": "..." }),
//!         0,
//!         3,
//!     ).await?;
//!
//!     if let Some(entry) = queue.dequeue().await? {
//!         queue.mark_completed(&entry.job_key).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod entry;
pub mod error;
pub mod queue;

pub use entry::{EmailDispatchPayload, JobKey, QueueEntry};
pub use error::{QueueError, QueueResult};
pub use queue::{DelayQueue, FailOutcome, QueueConfig};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::entry::{EmailDispatchPayload, JobKey, QueueEntry};
    pub use crate::error::{QueueError, QueueResult};
    pub use crate::queue::{DelayQueue, FailOutcome, QueueConfig};
}
