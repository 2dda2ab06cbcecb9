//! # OutBox
//!
//! Thin facade over the OutBox workspace: a durable job store, a delayed
//! job queue, a hierarchical rate limiter, a bounded-concurrency worker
//! pool, and the scheduling API that ties them together. The binary in
//! `src/main.rs` wires these into a runnable process; this library crate
//! just re-exports each component crate so a caller can depend on
//! `outbox` alone instead of naming every sub-crate.

pub use outbox_clock as clock;
pub use outbox_config as config;
pub use outbox_mail as mail;
pub use outbox_queue as queue;
pub use outbox_ratelimit as ratelimit;
pub use outbox_scheduler as scheduler;
pub use outbox_store as store;
pub use outbox_worker as worker;

pub use outbox_clock::{Clock, SharedClock, SystemClock};
pub use outbox_config::OutboxConfig;
pub use outbox_scheduler::{Recovery, RecoveryReport, ScheduleBulkRequest, ScheduleBulkResult, ScheduleOneRequest, Scheduler};
pub use outbox_store::{EmailJob, EmailJobStatus};
pub use outbox_worker::{WorkerPool, WorkerPoolConfig};
