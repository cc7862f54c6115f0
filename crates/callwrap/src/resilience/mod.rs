//! Retry controller and its building blocks
//!
//! - **[`backoff`]**: capped exponential delay growth
//! - **[`filter`]**: failure kinds and the two-stage retry classification
//! - **[`attempt_log`]**: per-attempt log records
//! - **[`retry`]**: the attempt loop, its configuration and layer
//!
//! ## Usage
//!
//! ```rust
//! use std::io;
//! use std::time::Duration;
//!
//! use callwrap::{operation, KindSet, Operation, Retry, RetryConfig};
//!
//! let config = RetryConfig::builder()
//!     .timeout(Duration::from_millis(20))
//!     .initial_delay(Duration::from_millis(1))
//!     .max_delay(Duration::from_millis(5))
//!     .retryable_kinds(KindSet::only([io::ErrorKind::TimedOut, io::ErrorKind::Interrupted])?)
//!     .retry_filter(|_error: &io::Error, path: &String| !path.starts_with("/proc"))
//!     .label("loader")
//!     .build()?;
//!
//! let load = Retry::new(operation("load", |path: String| Ok::<_, io::Error>(path.len())), config);
//! assert_eq!(load.call("/etc/hosts".to_string())?, 10);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod attempt_log;
pub mod backoff;
pub mod filter;
pub mod retry;

pub use attempt_log::AttemptLogger;
pub use backoff::BackoffScheduler;
pub use filter::{Failure, FailureKind, FilterVerdict, KindSet, RetryFilterChain};
pub use retry::{AttemptState, Retry, RetryConfig, RetryConfigBuilder, RetryLayer, RetryOutcome};
