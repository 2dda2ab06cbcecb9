//! The scheduling API: turns a schedule request into a stored
//! [`EmailJob`] plus a queue entry, and serves the read views the HTTP
//! façade exposes as `/api/emails*`.

use crate::dto::{ScheduleBulkRequest, ScheduleBulkResult, ScheduleOneRequest};
use crate::error::{SchedulerError, SchedulerResult};
use chrono::Duration as ChronoDuration;
use outbox_clock::SharedClock;
use outbox_config::OutboxConfig;
use outbox_queue::DelayQueue;
use outbox_store::{EmailJob, EmailJobStatus, JobStore, NewEmailJob, OrderBy};
use serde_json::json;

/// Owns the store and queue handles the scheduling API writes through,
/// plus the clock and config it reads `scheduled_at` math and retry
/// limits from.
#[derive(Clone)]
pub struct Scheduler {
    store: JobStore,
    queue: DelayQueue,
    clock: SharedClock,
    config: OutboxConfig,
}

impl Scheduler {
    pub fn new(store: JobStore, queue: DelayQueue, clock: SharedClock, config: OutboxConfig) -> Self {
        Self { store, queue, clock, config }
    }

    /// Schedule one email: resolve the sender, write the job record, and
    /// enqueue it for dispatch at the resolved send time.
    pub async fn schedule_one(&self, request: ScheduleOneRequest) -> SchedulerResult<EmailJob> {
        let user = self.store.upsert_user(&request.sender_email, request.sender_name.as_deref()).await?;
        let now = self.clock.now();

        let send_time = match request.delay_ms {
            Some(delay_ms) => now + ChronoDuration::milliseconds(delay_ms),
            None => request.scheduled_at.unwrap_or(now),
        };

        let job = self
            .store
            .create(NewEmailJob {
                user_id: user.id,
                recipient: request.recipient,
                subject: request.subject,
                body: request.body,
                scheduled_at: send_time,
            })
            .await?;

        self.enqueue_job(&job, send_time, now).await?;
        Ok(job)
    }

    /// Schedule a batch of identical emails to the same recipient list,
    /// spaced `delay_between_emails_ms` apart starting at `start_time`
    /// (or now).
    pub async fn schedule_bulk(&self, request: ScheduleBulkRequest) -> SchedulerResult<ScheduleBulkResult> {
        if request.recipients.is_empty() {
            return Err(SchedulerError::EmptyRecipients);
        }

        let user = self.store.upsert_user(&request.sender_email, request.sender_name.as_deref()).await?;
        let now = self.clock.now();
        let start_time = request.start_time.unwrap_or(now);

        let mut jobs = Vec::with_capacity(request.recipients.len());
        for (index, recipient) in request.recipients.iter().enumerate() {
            let send_time = start_time + ChronoDuration::milliseconds(index as i64 * request.delay_between_emails_ms);

            let job = self
                .store
                .create(NewEmailJob {
                    user_id: user.id,
                    recipient: recipient.clone(),
                    subject: request.subject.clone(),
                    body: request.body.clone(),
                    scheduled_at: send_time,
                })
                .await?;

            self.enqueue_job(&job, send_time, now).await?;
            jobs.push(job);
        }

        let last_index = request.recipients.len() as i64 - 1;
        let last_send_at = start_time + ChronoDuration::milliseconds(last_index * request.delay_between_emails_ms);

        Ok(ScheduleBulkResult {
            total_scheduled: jobs.len(),
            first_send_at: start_time,
            last_send_at,
            jobs,
        })
    }

    /// Every job ever scheduled, most recent first.
    pub async fn list_all(&self) -> SchedulerResult<Vec<EmailJob>> {
        Ok(self.store.list_all().await?)
    }

    /// Jobs still awaiting dispatch, soonest first. Per spec §6 this view
    /// is strictly `status = Scheduled`; in-flight `Processing` jobs are
    /// a worker-internal state, not part of this read model (they still
    /// count as "pending" for `JobStore::list_pending`/Recovery).
    pub async fn list_scheduled(&self) -> SchedulerResult<Vec<EmailJob>> {
        Ok(self.store.list_by_status(&[EmailJobStatus::Scheduled], OrderBy::ScheduledAtAsc).await?)
    }

    /// Jobs that reached a terminal outcome (sent or failed), most
    /// recently sent first, per spec §6's `/api/emails/sent` view.
    pub async fn list_sent(&self) -> SchedulerResult<Vec<EmailJob>> {
        Ok(self
            .store
            .list_by_status(&[EmailJobStatus::Sent, EmailJobStatus::Failed], OrderBy::SentAtDesc)
            .await?)
    }

    async fn enqueue_job(&self, job: &EmailJob, send_time: chrono::DateTime<chrono::Utc>, now: chrono::DateTime<chrono::Utc>) -> SchedulerResult<()> {
        let delay_ms = (send_time - now).num_milliseconds().max(0);
        let payload = json!({ "email_job_id": job.id });
        self.queue
            .enqueue(job.id.to_string(), payload, delay_ms, self.config.transport_retry_attempts)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_request_serializes_with_optional_fields_omitted() {
        let request = ScheduleBulkRequest {
            sender_email: "a@example.com".into(),
            sender_name: None,
            recipients: vec!["b@example.com".into()],
            subject: "Hi".into(),
            body: "Body".into(),
            start_time: None,
            delay_between_emails_ms: 1000,
            hourly_limit: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["delay_between_emails_ms"], 1000);
    }
}
