//! # OutBox Store
//!
//! The durable job store: the scheduling subsystem's source of truth for
//! every [`EmailJob`]'s lifecycle. Backed by Postgres via `sqlx`, row-level
//! writes only, no cross-row transactions — each job's state transitions
//! are independent.
//!
//! ```rust,no_run
//! use outbox_store::{JobStore, NewEmailJob};
//! use chrono::Utc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JobStore::connect("postgres://localhost/outbox").await?;
//! let user = store.upsert_user("alice@example.com", None).await?;
//! let job = store.create(NewEmailJob {
//!     user_id: user.id,
//!     recipient: "bob@example.com".to_string(),
//!     subject: "Hello".to_string(),
//!     body: "Hi Bob".to_string(),
//!     scheduled_at: Utc::now(),
//! }).await?;
//! println!("scheduled job {}", job.id);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod job;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use job::{EmailJob, EmailJobStatus, NewEmailJob, User};
pub use store::{JobStore, OrderBy};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::error::{StoreError, StoreResult};
    pub use crate::job::{EmailJob, EmailJobStatus, NewEmailJob, User};
    pub use crate::store::{JobStore, OrderBy};
}
