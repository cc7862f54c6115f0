//! Composable wrappers that add resilience and observability to fallible
//! operations.
//!
//! # Wrappers
//!
//! - [`Retry`]: timeout-bounded retry with capped exponential backoff and
//!   two-stage failure filtering (by kind, then by predicate)
//! - [`ExceptionLogger`]: logs any failure leaving the operation, then returns
//!   it unchanged
//! - [`EntryExitTracer`]: logs entry and exit of the operation at a configured
//!   severity, paying nothing but a level check when that severity is off
//!
//! Every wrapper is also a [`tower::Layer`], so any subset can be stacked in
//! any order with [`tower::ServiceBuilder`] or the [`OperationExt`] adapters.
//! The composed operation keeps the base operation's signature and
//! [`OperationMetadata`].
//!
//! # Feature Flags
//!
//! - `serde`: deserializable [`config`] settings (TOML loading included)
//! - `test-utils`: [`testing`] helpers (mock clock, recording log sink)
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use callwrap::{
//!     operation, Describe, Operation, OperationExt, RetryConfig, SinkProvider, TraceConfig,
//! };
//!
//! let config = RetryConfig::<std::io::Error, u32>::builder()
//!     .timeout(Duration::from_millis(50))
//!     .initial_delay(Duration::from_millis(1))
//!     .max_delay(Duration::from_millis(10))
//!     .label("doc-example")
//!     .build()
//!     .expect("valid retry configuration");
//!
//! let fetch = operation("fetch", |n: u32| Ok::<_, std::io::Error>(n * 2))
//!     .with_retry(config)
//!     .log_exceptions(SinkProvider::tracing())
//!     .trace_entry_exit(SinkProvider::tracing(), TraceConfig::default());
//!
//! assert_eq!(fetch.call(21).expect("fetch succeeds"), 42);
//! assert_eq!(fetch.metadata().name(), "fetch");
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod error;
pub mod observability;
pub mod operation;
pub mod resilience;
pub mod time;
pub mod utils;
pub mod wrappers;

#[cfg(feature = "serde")]
pub mod config;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use error::{ConfigError, ConfigResult};
pub use observability::{
    LogEvent, LogRecord, LogSink, NoOpSink, Severity, SinkProvider, TracingSink,
};
pub use operation::{operation, Describe, FnOperation, Operation, OperationMetadata};
pub use resilience::{
    BackoffScheduler, Failure, FailureKind, FilterVerdict, KindSet, Retry, RetryConfig,
    RetryConfigBuilder, RetryFilterChain, RetryLayer, RetryOutcome,
};
pub use time::{Clock, ClockReader, Sleeper, SystemClock, ThreadSleeper};
pub use wrappers::{
    EntryExitLayer, EntryExitTracer, ExceptionLogger, ExceptionLoggingLayer, OperationExt,
    TraceConfig,
};
