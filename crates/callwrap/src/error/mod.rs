//! Error types for wrapper construction
//!
//! The wrappers never convert the failures of the operations they wrap: a
//! wrapped call fails with exactly the error the base operation returned.
//! The only errors this crate produces itself are configuration errors,
//! raised when a [`RetryConfig`](crate::RetryConfig) is built from invalid
//! parameters. They are reported at construction time, before any operation
//! call happens, and are never silently coerced into valid values.

use std::time::Duration;

use thiserror::Error;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid retry configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The delay before the first retry must be strictly positive
    #[error("initial_delay must be greater than zero, got {initial_delay:?}")]
    NonPositiveInitialDelay {
        /// The rejected delay
        initial_delay: Duration,
    },

    /// The backoff ceiling cannot be lower than the first delay
    #[error("max_delay ({max_delay:?}) cannot be less than initial_delay ({initial_delay:?})")]
    MaxDelayBelowInitial {
        /// The rejected ceiling
        max_delay: Duration,
        /// The delay it was compared against
        initial_delay: Duration,
    },

    /// A duration given in floating-point seconds was negative, NaN or too
    /// large to represent
    #[error("{field} must be a finite, non-negative number of seconds, got {value}")]
    InvalidSeconds {
        /// Name of the setting
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// An explicit retryable-kind set was given but contains no kinds
    #[error("retryable_kinds must name at least one failure kind")]
    EmptyRetryableKinds,
}

impl ConfigError {
    /// Name of the configuration field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveInitialDelay { .. } => "initial_delay",
            Self::MaxDelayBelowInitial { .. } => "max_delay",
            Self::InvalidSeconds { field, .. } => field,
            Self::EmptyRetryableKinds => "retryable_kinds",
        }
    }
}
