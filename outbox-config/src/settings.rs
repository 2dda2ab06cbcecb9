//! Typed OutBox runtime settings, loaded from environment variables.

use crate::{ConfigError, EnvLoader, Result};
use std::time::Duration;

/// Recognized OutBox configuration surface.
///
/// Loaded via [`EnvLoader`] with an `OUTBOX` prefix (so `OUTBOX_WORKER_CONCURRENCY`
/// maps to `worker_concurrency`, etc). Unrecognized keys are ignored — forward
/// compatibility over strictness, matching how `ConfigManager` treats unknown keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxConfig {
    /// Parallel dispatches a worker pool runs at once.
    pub worker_concurrency: u32,
    /// Per-sender hourly send cap.
    pub max_emails_per_hour_per_sender: u32,
    /// Global hourly send cap across all senders.
    pub global_max_emails_per_hour: u32,
    /// Minimum spacing enforced between consecutive dispatches.
    pub min_delay_between_emails: Duration,
    /// Queue-level safety throttle, sends per second.
    pub queue_rate_limit: u32,
    /// Transport-failure retry attempts before dead-lettering.
    pub transport_retry_attempts: u32,
    /// Base delay for the transport-failure exponential backoff.
    pub transport_backoff_base: Duration,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: 5,
            max_emails_per_hour_per_sender: 50,
            global_max_emails_per_hour: 200,
            min_delay_between_emails: Duration::from_millis(2_000),
            queue_rate_limit: 100,
            transport_retry_attempts: 3,
            transport_backoff_base: Duration::from_secs(1),
        }
    }
}

impl OutboxConfig {
    /// Load settings from environment variables prefixed `OUTBOX_`, falling
    /// back to defaults for anything unset. Unparseable values are rejected;
    /// missing values are not.
    pub fn from_env() -> Result<Self> {
        let loader = EnvLoader::new(Some("OUTBOX".to_string()));
        let mut config = Self::default();

        if let Ok(v) = loader.load_var("WORKER_CONCURRENCY") {
            config.worker_concurrency = parse(&v, "worker_concurrency")?;
        }
        if let Ok(v) = loader.load_var("MAX_EMAILS_PER_HOUR_PER_SENDER") {
            config.max_emails_per_hour_per_sender = parse(&v, "max_emails_per_hour_per_sender")?;
        }
        if let Ok(v) = loader.load_var("GLOBAL_MAX_EMAILS_PER_HOUR") {
            config.global_max_emails_per_hour = parse(&v, "global_max_emails_per_hour")?;
        }
        if let Ok(v) = loader.load_var("MIN_DELAY_BETWEEN_EMAILS") {
            config.min_delay_between_emails = Duration::from_millis(parse(&v, "min_delay_between_emails")?);
        }
        if let Ok(v) = loader.load_var("QUEUE_RATE_LIMIT") {
            config.queue_rate_limit = parse(&v, "queue_rate_limit")?;
        }
        if let Ok(v) = loader.load_var("TRANSPORT_RETRY_ATTEMPTS") {
            config.transport_retry_attempts = parse(&v, "transport_retry_attempts")?;
        }
        if let Ok(v) = loader.load_var("TRANSPORT_BACKOFF_BASE_MS") {
            config.transport_backoff_base = Duration::from_millis(parse(&v, "transport_backoff_base")?);
        }

        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(value: &str, field: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("invalid value for {field}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_the_documented_table() {
        let config = OutboxConfig::default();
        assert_eq!(config.worker_concurrency, 5);
        assert_eq!(config.max_emails_per_hour_per_sender, 50);
        assert_eq!(config.global_max_emails_per_hour, 200);
        assert_eq!(config.min_delay_between_emails, Duration::from_millis(2_000));
        assert_eq!(config.queue_rate_limit, 100);
        assert_eq!(config.transport_retry_attempts, 3);
        assert_eq!(config.transport_backoff_base, Duration::from_secs(1));
    }

    #[test]
    fn from_env_overrides_only_set_keys() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            env::set_var("OUTBOX_WORKER_CONCURRENCY", "10");
        }

        let config = OutboxConfig::from_env().unwrap();
        assert_eq!(config.worker_concurrency, 10);
        assert_eq!(config.global_max_emails_per_hour, 200);

        unsafe {
            env::remove_var("OUTBOX_WORKER_CONCURRENCY");
        }
    }

    #[test]
    fn from_env_rejects_unparseable_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            env::set_var("OUTBOX_WORKER_CONCURRENCY", "not-a-number");
        }

        assert!(OutboxConfig::from_env().is_err());

        unsafe {
            env::remove_var("OUTBOX_WORKER_CONCURRENCY");
        }
    }
}
