//! The queue-level safety throttle: a hard cap on dispatch starts per
//! second across the whole pool, independent of `worker_concurrency`.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Paces callers of [`RateThrottle::acquire`] to at most `per_second`
/// completions per second, shared across every worker task.
pub struct RateThrottle {
    interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateThrottle {
    /// Build a throttle allowing `per_second` acquisitions per second.
    /// `per_second = 0` is treated as 1 to avoid a division by zero.
    pub fn new(per_second: u32) -> Self {
        let per_second = per_second.max(1);
        Self {
            interval: Duration::from_secs_f64(1.0 / per_second as f64),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Block until this caller's turn in the shared pacing schedule.
    pub async fn acquire(&self) {
        let wait_until = {
            let mut slot = self.next_slot.lock().await;
            let now = Instant::now();
            let target = if *slot > now { *slot } else { now };
            *slot = target + self.interval;
            target
        };

        let now = Instant::now();
        if wait_until > now {
            tokio::time::sleep(wait_until - now).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn throttle_spaces_out_acquisitions() {
        let throttle = RateThrottle::new(10);
        let start = Instant::now();

        throttle.acquire().await;
        throttle.acquire().await;
        throttle.acquire().await;

        // third acquisition should land no earlier than 200ms after start
        // (two 100ms intervals at 10/s), proving the pacing is enforced.
        assert!(Instant::now() >= start + Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn a_single_acquisition_does_not_wait() {
        let throttle = RateThrottle::new(100);
        let start = Instant::now();
        throttle.acquire().await;
        assert_eq!(Instant::now(), start);
    }

    #[test]
    fn zero_per_second_does_not_panic() {
        let _throttle = RateThrottle::new(0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquisitions_still_serialize() {
        use std::sync::Arc;
        let throttle = Arc::new(RateThrottle::new(5));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..5 {
            let t = throttle.clone();
            handles.push(tokio::spawn(async move {
                t.acquire().await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        advance(Duration::from_secs(1)).await;
        assert!(Instant::now() <= start + Duration::from_secs(2));
    }
}
