//! Exponential backoff with jitter, applied by senders before a retry.

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
        }
    }

    /// No waiting at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Delay before `attempt` (1-based).
    ///
    /// Attempt 1 never waits. Attempt n waits `min(base * 2^(n-2), max)`
    /// plus up to half of that again as jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.base.is_zero() {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 2).unwrap_or(u32::MAX);
        let delay = self.base.saturating_mul(factor).min(self.max);
        let jitter_ms = (delay.as_millis() / 2) as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        delay + Duration::from_millis(jitter)
    }

    /// Sleep for [`Backoff::delay_for`] `attempt`.
    pub fn wait(&self, attempt: u32) {
        let delay = self.delay_for(attempt);
        if !delay.is_zero() {
            tracing::debug!("waiting {} ms before attempt {attempt}", delay.as_millis());
            std::thread::sleep(delay);
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(8))
    }
}
