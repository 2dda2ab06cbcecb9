//! Request and result shapes for the scheduler API. These are the
//! in-process counterparts of the `POST /api/schedule` /
//! `POST /api/schedule/bulk` bodies; an HTTP façade binds the sender's
//! identity from its own auth layer and fills `sender_email` before
//! calling through.

use chrono::{DateTime, Utc};
use outbox_store::EmailJob;
use serde::{Deserialize, Serialize};

/// Request to schedule a single email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOneRequest {
    /// Email of the sending user. Resolved via `upsert_user`, so a new
    /// sender is created on first use.
    pub sender_email: String,
    /// Display name for the sender, if this is their first job.
    pub sender_name: Option<String>,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    /// Absolute send time. Defaults to now if neither this nor `delay_ms`
    /// is set.
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Relative delay in milliseconds from now. When both this and
    /// `scheduled_at` are set, `delay_ms` wins — the last writer to the
    /// record's `scheduled_at` column, matching the original service's
    /// behavior (spec §9).
    pub delay_ms: Option<i64>,
}

/// Request to schedule a batch of identical emails, evenly spaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBulkRequest {
    pub sender_email: String,
    pub sender_name: Option<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    /// Send time for the first recipient. Defaults to now.
    pub start_time: Option<DateTime<Utc>>,
    /// Spacing between consecutive recipients' send times.
    pub delay_between_emails_ms: i64,
    /// Accepted for API compatibility but not enforced here: rate limiting
    /// of the batch itself is the worker pool's job at dispatch time, not
    /// the scheduler's at enqueue time (spec §9 Open Question).
    pub hourly_limit: Option<u32>,
}

/// Outcome of [`crate::scheduler::Scheduler::schedule_bulk`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBulkResult {
    pub total_scheduled: usize,
    pub first_send_at: DateTime<Utc>,
    pub last_send_at: DateTime<Utc>,
    pub jobs: Vec<EmailJob>,
}
