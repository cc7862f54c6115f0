//! Observability primitives shared by every wrapper
//!
//! - [`LogSink`]: leveled record destination with an enablement query
//! - [`SinkProvider`]: lazily resolves the sink at call time
//! - [`TracingSink`]: default sink, forwards to `tracing`
//! - [`stack`]: caller stack snapshots attached to failure records

pub mod sink;
pub mod stack;

pub use sink::{LogEvent, LogRecord, LogSink, NoOpSink, Severity, SinkProvider, TracingSink};
pub use stack::caller_stack;
