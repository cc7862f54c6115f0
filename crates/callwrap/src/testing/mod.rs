//! Testing utilities and helpers
//!
//! - **[`time`]**: [`MockClock`], a controllable clock that doubles as a
//!   recording [`Sleeper`](crate::Sleeper)
//! - **[`sink`]**: [`RecordingSink`], an in-memory [`LogSink`](crate::LogSink)
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use callwrap::testing::{MockClock, RecordingSink};
//! use callwrap::{operation, Operation, OperationExt, RetryConfig};
//!
//! let clock = MockClock::new();
//! let logs = RecordingSink::new();
//! let config = RetryConfig::<std::io::Error, ()>::builder()
//!     .timeout(Duration::from_secs(1))
//!     .initial_delay(Duration::from_millis(200))
//!     .max_delay(Duration::from_secs(1))
//!     .clock(clock.clone())
//!     .sleeper(clock.clone())
//!     .sink_provider(logs.provider())
//!     .build()
//!     .unwrap();
//!
//! let op = operation("always_fails", |_: ()| Err::<(), _>(std::io::Error::other("down")))
//!     .with_retry(config);
//!
//! assert!(op.call(()).is_err());
//! assert_eq!(
//!     clock.sleeps(),
//!     vec![Duration::from_millis(200), Duration::from_millis(400), Duration::from_millis(800)]
//! );
//! ```

pub mod sink;
pub mod time;

pub use sink::RecordingSink;
pub use time::MockClock;
