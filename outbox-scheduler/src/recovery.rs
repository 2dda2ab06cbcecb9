//! Startup recovery: reconciles the job store against the delay queue so
//! a crash or redeploy never strands a job. Mirrors the pack's
//! `CronScheduler::start` pattern of logging a summary once the catch-up
//! pass completes.

use crate::error::SchedulerResult;
use outbox_clock::SharedClock;
use outbox_queue::DelayQueue;
use outbox_store::{EmailJobStatus, JobStore};
use serde_json::json;
use tracing::info;

/// Summary of a [`Recovery::run`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryReport {
    /// Jobs re-enqueued because the queue had no matching entry.
    pub requeued: usize,
    /// Jobs found stuck in `Processing` (the worker died mid-dispatch)
    /// and reset back to `Scheduled`.
    pub reset_processing: usize,
}

/// Reconciles every non-terminal job against the delay queue at startup.
pub struct Recovery;

impl Recovery {
    /// Walk every `Scheduled`/`Processing` job: reset any stuck in
    /// `Processing`, then re-enqueue anything the queue has lost track
    /// of (crash before `enqueue`, or a queue flush).
    pub async fn run(
        store: &JobStore,
        queue: &DelayQueue,
        clock: &SharedClock,
        retry_limit: u32,
    ) -> SchedulerResult<RecoveryReport> {
        let pending = store.list_pending().await?;
        let now = clock.now();
        let mut report = RecoveryReport::default();

        for job in pending {
            if job.status == EmailJobStatus::Processing {
                store.update_status(job.id, EmailJobStatus::Scheduled, None, None).await?;
                report.reset_processing += 1;
            }

            let job_key = job.id.to_string();
            if !queue.exists(&job_key).await? {
                let delay_ms = (job.scheduled_at - now).num_milliseconds().max(0);
                let payload = json!({ "email_job_id": job.id });
                queue.enqueue(job_key, payload, delay_ms, retry_limit).await?;
                report.requeued += 1;
            }
        }

        info!(requeued = report.requeued, reset_processing = report.reset_processing, "startup recovery complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_to_zero() {
        let report = RecoveryReport::default();
        assert_eq!(report.requeued, 0);
        assert_eq!(report.reset_processing, 0);
    }
}
