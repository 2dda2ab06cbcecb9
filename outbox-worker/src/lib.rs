//! # OutBox Worker
//!
//! The bounded-concurrency worker pool: `worker_concurrency` independent
//! consumers pulling ready entries off the delay queue, each running the
//! end-to-end dispatch algorithm (load record, idempotency gate, rate
//! check, throttle, send, record outcome) with no shared mutable state
//! beyond the atomic rate counters.
//!
//! ```rust,no_run
//! use outbox_worker::{WorkerPool, WorkerPoolConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(
//! #     store: outbox_store::JobStore,
//! #     queue: outbox_queue::DelayQueue,
//! #     rate_limiter: outbox_ratelimit::RateLimiter,
//! #     mailer: outbox_mail::Mailer,
//! # ) {
//! let config = WorkerPoolConfig {
//!     worker_concurrency: 5,
//!     min_delay_between_emails: Duration::from_millis(2000),
//!     queue_rate_limit: 100,
//!     transport_retry_attempts: 3,
//!     poll_interval: Duration::from_millis(250),
//! };
//! let pool = WorkerPool::new(store, queue, rate_limiter, mailer, Arc::new(outbox_clock::SystemClock), config);
//! let cancel = CancellationToken::new();
//! let handles = pool.start(cancel.clone());
//! # let _ = handles;
//! # }
//! ```

pub mod error;
pub mod pool;
pub mod throttle;

pub use error::{DispatchOutcome, WorkerError, WorkerResult};
pub use pool::{WorkerPool, WorkerPoolConfig};
pub use throttle::RateThrottle;
