//! Time mocking for deterministic retry tests
//!
//! [`MockClock`] implements both [`Clock`] and [`Sleeper`]: a retry
//! controller configured with it "sleeps" by advancing the clock, so delay
//! sequences and timeout budgets can be asserted exactly and tests finish
//! instantly.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use callwrap::testing::MockClock;
//! use callwrap::{Clock, Sleeper};
//!
//! let clock = MockClock::new();
//! let start = clock.system_time();
//!
//! clock.sleep(Duration::from_millis(200));
//! clock.sleep(Duration::from_millis(400));
//!
//! assert_eq!(clock.sleeps(), vec![Duration::from_millis(200), Duration::from_millis(400)]);
//! assert_eq!(clock.system_time().duration_since(start).unwrap(), Duration::from_millis(600));
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::time::{Clock, Sleeper};

/// Fixed wall-clock origin so rewinding never underflows the epoch
const MOCK_WALL_ORIGIN_SECS: u64 = 1_700_000_000;

#[derive(Debug)]
struct MockState {
    elapsed: Duration,
    wall: SystemTime,
    sleeps: Vec<Duration>,
}

/// Mock clock for deterministic testing
///
/// Clones share the same underlying time.
#[derive(Debug, Clone)]
pub struct MockClock {
    state: Arc<Mutex<MockState>>,
}

impl MockClock {
    /// Create a new mock clock
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                elapsed: Duration::ZERO,
                wall: UNIX_EPOCH + Duration::from_secs(MOCK_WALL_ORIGIN_SECS),
                sleeps: Vec::new(),
            })),
        }
    }

    /// Advance the wall clock and the total elapsed time
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.elapsed += duration;
        state.wall += duration;
    }

    /// Move the wall clock backward, leaving the total elapsed time untouched
    pub fn rewind(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.wall = state.wall.checked_sub(duration).unwrap_or(UNIX_EPOCH);
    }

    /// Total time advanced so far, unaffected by rewinds
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed
    }

    /// Every delay passed to [`Sleeper::sleep`], in order
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().sleeps.clone()
    }

    /// Sum of every delay passed to [`Sleeper::sleep`]
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        self.state.lock().sleeps.iter().sum()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn system_time(&self) -> SystemTime {
        self.state.lock().wall
    }
}

impl Sleeper for MockClock {
    fn sleep(&self, duration: Duration) {
        self.state.lock().sleeps.push(duration);
        self.advance(duration);
    }
}
