//! Time sources and blocking delays used by the retry controller

pub mod clock;

pub use clock::{Clock, ClockReader, Sleeper, SystemClock, ThreadSleeper};
