//! The `EmailJob` record and its state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status of an [`EmailJob`]. `Sent` and `Failed` are terminal for the
/// record: a retry after a rate-limit deferral re-enters the pipeline
/// through a new queue entry, never a new store row, and never moves a
/// terminal record back out of its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "email_job_status", rename_all = "snake_case")]
pub enum EmailJobStatus {
    #[default]
    Scheduled,
    Processing,
    Sent,
    Failed,
}

impl EmailJobStatus {
    /// Whether this status is one Recovery's `ListPending` should surface.
    pub fn is_pending(&self) -> bool {
        matches!(self, EmailJobStatus::Scheduled | EmailJobStatus::Processing)
    }

    /// Whether this status is terminal for the record.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmailJobStatus::Sent | EmailJobStatus::Failed)
    }
}

/// A scheduled email, from creation through terminal delivery outcome.
///
/// Invariants (enforced by the store, not by this type alone):
/// - `id` is assigned on create and never changes.
/// - `sent_at` is `Some` iff `status == Sent`; `failed_at` is `Some` iff
///   `status == Failed`.
/// - `scheduled_at` never changes after creation, even when a rate-limit
///   deferral pushes the queue entry's `ready_at` into a later window.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: EmailJobStatus,
    pub scheduled_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a new [`EmailJob`]. The store assigns `id`,
/// `status`, `created_at`, and `updated_at`.
#[derive(Debug, Clone)]
pub struct NewEmailJob {
    pub user_id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub scheduled_at: DateTime<Utc>,
}

/// A minimal identity record, upserted by email on first use.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_statuses_are_scheduled_and_processing_only() {
        assert!(EmailJobStatus::Scheduled.is_pending());
        assert!(EmailJobStatus::Processing.is_pending());
        assert!(!EmailJobStatus::Sent.is_pending());
        assert!(!EmailJobStatus::Failed.is_pending());
    }

    #[test]
    fn terminal_statuses_are_sent_and_failed_only() {
        assert!(!EmailJobStatus::Scheduled.is_terminal());
        assert!(!EmailJobStatus::Processing.is_terminal());
        assert!(EmailJobStatus::Sent.is_terminal());
        assert!(EmailJobStatus::Failed.is_terminal());
    }

    #[test]
    fn default_status_is_scheduled() {
        assert_eq!(EmailJobStatus::default(), EmailJobStatus::Scheduled);
    }
}
