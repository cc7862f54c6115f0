//! Capped exponential backoff
//!
//! Growth is deterministic: each retried failure doubles the delay until it
//! reaches the ceiling. There is no jitter, so a configuration always yields
//! the same delay sequence.

use std::time::Duration;

/// Computes the delay before the next retry from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffScheduler {
    max_delay: Duration,
}

impl BackoffScheduler {
    /// Scheduler capping every delay at `max_delay`
    pub fn new(max_delay: Duration) -> Self {
        Self { max_delay }
    }

    /// Backoff ceiling
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// `min(delay * 2, max_delay)`, saturating instead of overflowing
    pub fn next(&self, delay: Duration) -> Duration {
        delay.saturating_mul(2).min(self.max_delay)
    }

    /// The delay sequence starting at `initial`: `d, min(2d, m), min(4d, m), ...`
    pub fn delays(&self, initial: Duration) -> impl Iterator<Item = Duration> {
        let scheduler = *self;
        std::iter::successors(Some(initial), move |delay| Some(scheduler.next(*delay)))
    }
}
