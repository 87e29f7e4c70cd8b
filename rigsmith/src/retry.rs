//! Backoff policy for throttled marketplace requests.
//!
//! Only "too many requests" responses are retried; the delay before retry `n`
//! (0-based) is `base_delay * 2^n`.

use std::time::Duration;

/// Default delay before the first retry. Equal to the default fetch spacing, so each backoff
/// step is at least one pacer slot and the doubling stays visible between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

/// Exponential backoff with a fixed retry cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: DEFAULT_BASE_DELAY,
            max_retries: 5,
        }
    }
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration, max_retries: usize) -> Self {
        Self {
            base_delay,
            max_retries,
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, 0)
    }

    /// Returns `true` when retry number `retry` (0-based) is still allowed.
    pub fn should_retry(&self, retry: usize) -> bool {
        retry < self.max_retries
    }

    /// Delay to wait before retry number `retry` (0-based).
    pub fn delay(&self, retry: usize) -> Duration {
        let factor = 2u32.saturating_pow(retry.min(31) as u32);
        self.base_delay.saturating_mul(factor)
    }
}
