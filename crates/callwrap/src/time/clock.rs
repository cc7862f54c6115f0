//! Clock and sleep abstractions for testability
//!
//! The retry controller budgets its retry window against wall-clock time,
//! which is not monotonic: NTP corrections or manual changes can move it
//! backward. [`ClockReader`] owns the policy for that case. Both the clock
//! and the blocking delay are injectable so tests can run the retry loop
//! deterministically without real time passing.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Source of wall-clock readings, injectable for deterministic testing
pub trait Clock: Send + Sync {
    /// Get current system time (wall clock, may move backward)
    fn system_time(&self) -> SystemTime;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn system_time(&self) -> SystemTime {
        (**self).system_time()
    }
}

/// Blocks the calling thread between retry attempts
pub trait Sleeper: Send + Sync {
    /// Block for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by [`std::thread::sleep`]
///
/// WARNING: this blocks the calling thread. Do not use it from inside an
/// async runtime worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Reads wall-clock time and measures elapsed time against a start reading
///
/// If a reading is earlier than the start (the clock jumped backward), the
/// start is moved to that reading and the elapsed time is zero. A clock that
/// jumps backward therefore neither produces a negative elapsed time nor
/// exhausts a budget early; the budget restarts from the new reading.
#[derive(Clone)]
pub struct ClockReader {
    clock: Arc<dyn Clock>,
}

impl ClockReader {
    /// Create a reader over the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current wall-clock reading
    pub fn now(&self) -> SystemTime {
        self.clock.system_time()
    }

    /// Elapsed time since `start`, resetting `start` on a backward jump
    pub fn elapsed_since(&self, start: &mut SystemTime) -> Duration {
        let now = self.clock.system_time();
        match now.duration_since(*start) {
            Ok(elapsed) => elapsed,
            Err(_) => {
                *start = now;
                Duration::ZERO
            }
        }
    }
}

impl Default for ClockReader {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for ClockReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockReader").finish_non_exhaustive()
    }
}
