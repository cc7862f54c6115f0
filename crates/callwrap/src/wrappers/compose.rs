//! Adapter methods for stacking wrappers
//!
//! Each method wraps `self` in one more layer; the last call made is the
//! outermost wrapper and runs first. The same stacks can be built with
//! [`tower::ServiceBuilder`], where the first `.layer(..)` is outermost:
//!
//! ```rust
//! use std::io;
//! use std::time::Duration;
//!
//! use callwrap::{
//!     operation, Describe, EntryExitLayer, ExceptionLoggingLayer, Operation, RetryConfig,
//!     RetryLayer, SinkProvider, TraceConfig,
//! };
//! use tower::ServiceBuilder;
//!
//! let config = RetryConfig::<io::Error, u32>::builder()
//!     .timeout(Duration::from_millis(10))
//!     .initial_delay(Duration::from_millis(1))
//!     .max_delay(Duration::from_millis(2))
//!     .build()?;
//!
//! let lookup = ServiceBuilder::new()
//!     .layer(EntryExitLayer::new(SinkProvider::tracing(), TraceConfig::default()))
//!     .layer(ExceptionLoggingLayer::new(SinkProvider::tracing()))
//!     .layer(RetryLayer::new(config))
//!     .service(operation("lookup", |id: u32| Ok::<_, io::Error>(id * 10)));
//!
//! assert_eq!(lookup.call(4)?, 40);
//! assert_eq!(lookup.metadata().name(), "lookup");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use tower::Layer;

use super::entry_exit::{EntryExitTracer, TraceConfig};
use super::exception_log::ExceptionLogger;
use crate::observability::SinkProvider;
use crate::operation::Describe;
use crate::resilience::{Failure, Retry, RetryConfig};

/// Wrapper adapters available on every operation
pub trait OperationExt: Describe + Sized {
    /// Retry under `config`
    fn with_retry<E: Failure, A>(self, config: RetryConfig<E, A>) -> Retry<Self, E, A> {
        Retry::new(self, config)
    }

    /// Log failures to `provider` before returning them
    fn log_exceptions(self, provider: SinkProvider) -> ExceptionLogger<Self> {
        ExceptionLogger::new(self, provider)
    }

    /// Log entry and exit to `provider`
    fn trace_entry_exit(self, provider: SinkProvider, config: TraceConfig) -> EntryExitTracer<Self> {
        EntryExitTracer::new(self, provider, config)
    }

    /// Apply any [`Layer`]
    fn layer<L: Layer<Self>>(self, layer: L) -> L::Service {
        layer.layer(self)
    }
}

impl<T: Describe> OperationExt for T {}
