//! Process entry point: wires the store, queue, rate limiter, mailer, and
//! worker pool together, runs startup recovery, then runs until asked to
//! shut down.

use anyhow::Context;
use outbox_clock::SystemClock;
use outbox_config::OutboxConfig;
use outbox_mail::{Mailer, SmtpConfig, SmtpSecurity};
use outbox_queue::{DelayQueue, QueueConfig};
use outbox_ratelimit::{RateLimitConfig, RateLimiter};
use outbox_scheduler::{Recovery, Scheduler};
use outbox_store::JobStore;
use outbox_worker::{WorkerPool, WorkerPoolConfig};
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    outbox_log::init();
    tracing::subscriber::set_global_default(outbox_log::tracing_compat::subscriber())
        .context("failed to install tracing subscriber")?;

    tracing::info!("starting outbox");

    let config = OutboxConfig::from_env().context("failed to load outbox configuration")?;
    let clock: outbox_clock::SharedClock = Arc::new(SystemClock);

    let database_url = env::var("OUTBOX_DATABASE_URL").context("OUTBOX_DATABASE_URL must be set")?;
    let store = JobStore::connect(&database_url).await.context("failed to connect job store")?;

    let redis_url = env::var("OUTBOX_REDIS_URL").context("OUTBOX_REDIS_URL must be set")?;
    let queue = DelayQueue::with_config(QueueConfig::new(redis_url.clone()))
        .await
        .context("failed to connect delay queue")?;

    let rate_limiter = build_rate_limiter(&config, &redis_url).await.context("failed to build rate limiter")?;
    let mailer = build_mailer().await.context("failed to build mailer")?;

    tracing::info!("running startup recovery");
    let report = Recovery::run(&store, &queue, &clock, config.transport_retry_attempts)
        .await
        .context("startup recovery failed")?;
    tracing::info!(requeued = report.requeued, reset_processing = report.reset_processing, "recovery complete");

    let scheduler = Scheduler::new(store.clone(), queue.clone(), clock.clone(), config.clone());
    // The scheduler is the seam an HTTP façade would bind to; this binary
    // has no façade of its own, so it simply holds the handle alive for
    // the process lifetime it would otherwise serve.
    let _ = scheduler;

    let pool = WorkerPool::new(store, queue, rate_limiter, mailer, clock, WorkerPoolConfig::from(&config));

    let cancel = CancellationToken::new();
    let handles = pool.start(cancel.clone());
    tracing::info!(worker_concurrency = config.worker_concurrency, "worker pool started");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    tracing::info!("shutdown signal received, draining in-flight dispatches");
    cancel.cancel();

    for handle in handles {
        let _ = handle.await;
    }
    tracing::info!("outbox stopped");

    Ok(())
}

async fn build_rate_limiter(config: &OutboxConfig, redis_url: &str) -> anyhow::Result<RateLimiter> {
    let builder = RateLimiter::builder()
        .max_per_sender_per_hour(config.max_emails_per_hour_per_sender as u64)
        .max_global_per_hour(config.global_max_emails_per_hour as u64)
        .key_prefix("outbox:ratelimit");

    let builder = if cfg!(feature = "redis-ratelimit") {
        with_redis_store(builder, redis_url)
    } else {
        builder
    };

    Ok(builder.build().await?)
}

#[cfg(feature = "redis-ratelimit")]
fn with_redis_store(builder: outbox_ratelimit::RateLimiterBuilder, redis_url: &str) -> outbox_ratelimit::RateLimiterBuilder {
    builder.redis_store(redis_url)
}

#[cfg(not(feature = "redis-ratelimit"))]
fn with_redis_store(builder: outbox_ratelimit::RateLimiterBuilder, _redis_url: &str) -> outbox_ratelimit::RateLimiterBuilder {
    builder.memory_store()
}

async fn build_mailer() -> anyhow::Result<Mailer> {
    let host = env::var("OUTBOX_SMTP_HOST").context("OUTBOX_SMTP_HOST must be set")?;
    let mut smtp_config = SmtpConfig::new(host);

    if let Ok(port) = env::var("OUTBOX_SMTP_PORT") {
        smtp_config.port = port.parse().context("OUTBOX_SMTP_PORT must be a valid port number")?;
    }
    if let Ok(security) = env::var("OUTBOX_SMTP_SECURITY") {
        smtp_config.security = match security.to_lowercase().as_str() {
            "tls" => SmtpSecurity::Tls,
            "starttls" => SmtpSecurity::StartTls,
            "none" => SmtpSecurity::None,
            other => anyhow::bail!("unrecognized OUTBOX_SMTP_SECURITY value: {other}"),
        };
    }
    smtp_config.username = env::var("OUTBOX_SMTP_USERNAME").ok();
    smtp_config.password = env::var("OUTBOX_SMTP_PASSWORD").ok();

    let mailer = Mailer::smtp(smtp_config).await?;
    let mailer = if let Ok(from) = env::var("OUTBOX_DEFAULT_FROM") {
        mailer.default_from(&from)?
    } else {
        mailer
    };

    Ok(mailer)
}
