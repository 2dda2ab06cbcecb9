//! # OutBox Clock
//!
//! A single-method seam trait for reading the current time, so the
//! scheduling subsystem never calls `Utc::now()` directly. Production code
//! runs on [`SystemClock`]; tests run on [`ManualClock`], which only moves
//! forward when told to, so delay-queue and rate-limit window tests are
//! deterministic instead of racing the wall clock.
//!
//! ## Quick Start
//!
//! ```rust
//! use outbox_clock::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let now = clock.now();
//! assert!(now.timestamp() > 0);
//! ```

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};

/// A source of the current time.
///
/// One method, mirroring the shape of this framework's other injectable
/// seams (`outbox_mail::Transport`, `outbox_ratelimit::RateLimitStore`):
/// one trait, one implementation for production, one for tests.
pub trait Clock: Send + Sync {
    /// The current time, in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock. Delegates to `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a caller-controlled instant, cloneable and shareable
/// across tasks. Used by the worker pool and scheduler test suites to
/// assert exact `scheduled_at`/`ready_at` ordering without sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    /// Start the clock at a fixed instant.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Start the clock at the current wall-clock time, then freeze it there.
    pub fn frozen_at_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward by `duration`.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.now.write().unwrap();
        *guard += duration;
    }

    /// Jump the clock to an absolute instant. Must not move backward; the
    /// scheduling subsystem assumes monotonic time within a process.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut guard = self.now.write().unwrap();
        assert!(instant >= *guard, "ManualClock must not move backward");
        *guard = instant;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}

/// Type alias for a shared, dynamically-dispatched clock handle, the shape
/// every OutBox component that needs time actually stores.
pub type SharedClock = Arc<dyn Clock>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_reports_real_time() {
        let clock = SystemClock;
        let before = Utc::now();
        let reading = clock.now();
        let after = Utc::now();
        assert!(reading >= before && reading <= after);
    }

    #[test]
    fn manual_clock_holds_still_until_advanced() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn manual_clock_advances_by_exact_duration() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(10));
    }

    #[test]
    fn manual_clock_set_jumps_forward() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let target = start + chrono::Duration::hours(1);
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    #[should_panic(expected = "must not move backward")]
    fn manual_clock_set_rejects_going_backward() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.set(start - chrono::Duration::seconds(1));
    }

    #[test]
    fn manual_clock_clones_share_the_same_underlying_time() {
        let clock = ManualClock::new(Utc::now());
        let clone = clock.clone();
        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(clock.now(), clone.now());
    }

    #[test]
    fn shared_clock_type_alias_accepts_either_impl() {
        let system: SharedClock = Arc::new(SystemClock);
        let manual: SharedClock = Arc::new(ManualClock::new(Utc::now()));
        let _ = system.now();
        let _ = manual.now();
    }
}
