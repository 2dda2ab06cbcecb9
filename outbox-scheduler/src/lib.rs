//! # OutBox Scheduler
//!
//! The scheduling API (`Scheduler::schedule_one` / `schedule_bulk` / the
//! `list_*` read views) and the startup [`Recovery`] pass that reconciles
//! the job store against the delay queue after a restart.
//!
//! ```rust,no_run
//! use outbox_scheduler::{Recovery, Scheduler};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     store: outbox_store::JobStore,
//! #     queue: outbox_queue::DelayQueue,
//! #     config: outbox_config::OutboxConfig,
//! # ) -> Result<(), outbox_scheduler::SchedulerError> {
//! let clock: outbox_clock::SharedClock = Arc::new(outbox_clock::SystemClock);
//! Recovery::run(&store, &queue, &clock, config.transport_retry_attempts).await?;
//!
//! let scheduler = Scheduler::new(store, queue, clock, config);
//! # let _ = scheduler;
//! # Ok(())
//! # }
//! ```

pub mod dto;
pub mod error;
pub mod recovery;
pub mod scheduler;

pub use dto::{ScheduleBulkRequest, ScheduleBulkResult, ScheduleOneRequest};
pub use error::{SchedulerError, SchedulerResult};
pub use recovery::{Recovery, RecoveryReport};
pub use scheduler::Scheduler;

/// Commonly used types, for `use outbox_scheduler::prelude::*;`.
pub mod prelude {
    pub use crate::dto::{ScheduleBulkRequest, ScheduleBulkResult, ScheduleOneRequest};
    pub use crate::error::{SchedulerError, SchedulerResult};
    pub use crate::recovery::{Recovery, RecoveryReport};
    pub use crate::scheduler::Scheduler;
}
