//! Entry/exit tracing
//!
//! When tracing is off, either because [`TraceConfig::severity`] is `None` or
//! because the sink reports the severity as disabled, a call costs at most
//! one provider lookup and one level check: no argument formatting, no stack
//! capture, no records.

use std::fmt;
use std::sync::Arc;

use tower::Layer;

use crate::observability::{caller_stack, LogEvent, LogRecord, LogSink, Severity, SinkProvider};
use crate::operation::{Describe, Operation, OperationMetadata};

/// Settings of an [`EntryExitTracer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Severity of the entry and exit records; `None` turns tracing off
    pub severity: Option<Severity>,
    /// Include the call arguments (their `Debug` form) in both records
    pub log_args: bool,
    /// Attach a stack snapshot to both records
    pub log_stack: bool,
}

impl TraceConfig {
    /// Tracing turned off
    pub fn disabled() -> Self {
        Self { severity: None, ..Self::default() }
    }

    /// Set the record severity; `None` turns tracing off
    #[must_use]
    pub fn with_severity(mut self, severity: Option<Severity>) -> Self {
        self.severity = severity;
        self
    }

    /// Include the call arguments in both records
    #[must_use]
    pub fn with_args(mut self, log_args: bool) -> Self {
        self.log_args = log_args;
        self
    }

    /// Attach a stack snapshot to both records
    #[must_use]
    pub fn with_stack(mut self, log_stack: bool) -> Self {
        self.log_stack = log_stack;
        self
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { severity: Some(Severity::Debug), log_args: false, log_stack: false }
    }
}

/// Logs `ENTERING` before and `LEAVING` after each call of the wrapped
/// operation
///
/// The exit record is emitted whether the call succeeds, fails or panics.
///
/// The wrapper is an [`Operation`] only for argument types implementing
/// [`fmt::Debug`], even when [`TraceConfig::log_args`] is off. Arguments are
/// rendered only when a record is actually emitted with `log_args` set.
/// Wrap arguments without a `Debug` impl in a newtype with a manual one to
/// trace such operations.
#[derive(Clone)]
pub struct EntryExitTracer<O> {
    inner: O,
    provider: SinkProvider,
    config: TraceConfig,
    metadata: OperationMetadata,
}

impl<O: Describe> EntryExitTracer<O> {
    /// Wrap `inner`, copying its metadata
    pub fn new(inner: O, provider: SinkProvider, config: TraceConfig) -> Self {
        let metadata = inner.metadata().clone();
        Self { inner, provider, config, metadata }
    }
}

impl<O> EntryExitTracer<O> {
    /// Tracing settings
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// The wrapped operation
    pub fn get_ref(&self) -> &O {
        &self.inner
    }

    /// Unwrap the inner operation
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O> Describe for EntryExitTracer<O> {
    fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }
}

impl<O, A> Operation<A> for EntryExitTracer<O>
where
    O: Operation<A>,
    A: fmt::Debug,
{
    type Output = O::Output;
    type Error = O::Error;

    fn call(&self, args: A) -> Result<Self::Output, Self::Error> {
        let Some(severity) = self.config.severity else {
            return self.inner.call(args);
        };
        let sink = self.provider.sink();
        if !sink.enabled(severity) {
            return self.inner.call(args);
        }

        let args_repr = if self.config.log_args { format!("{args:?}") } else { String::new() };
        let _scope =
            TraceScope::enter(sink, severity, &self.metadata, args_repr, self.config.log_stack);
        self.inner.call(args)
    }
}

impl<O: fmt::Debug> fmt::Debug for EntryExitTracer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryExitTracer")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}

/// Emits the entry record on creation and the exit record on drop
struct TraceScope<'a> {
    sink: Arc<dyn LogSink>,
    severity: Severity,
    metadata: &'a OperationMetadata,
    args: String,
    log_stack: bool,
}

impl<'a> TraceScope<'a> {
    fn enter(
        sink: Arc<dyn LogSink>,
        severity: Severity,
        metadata: &'a OperationMetadata,
        args: String,
        log_stack: bool,
    ) -> Self {
        let scope = Self { sink, severity, metadata, args, log_stack };
        scope.emit(LogEvent::Entering, "ENTERING");
        scope
    }

    fn emit(&self, event: LogEvent, verb: &str) {
        let message = format!("{verb}: {}({})", self.metadata, self.args);
        let stack = self.log_stack.then(caller_stack);
        let record = LogRecord::new(self.severity, event, self.metadata.name_cow(), message)
            .with_stack(stack);
        self.sink.emit(&record);
    }
}

impl Drop for TraceScope<'_> {
    fn drop(&mut self) {
        self.emit(LogEvent::Leaving, "LEAVING");
    }
}

/// [`Layer`] producing [`EntryExitTracer`] wrappers
#[derive(Debug, Clone, Default)]
pub struct EntryExitLayer {
    provider: SinkProvider,
    config: TraceConfig,
}

impl EntryExitLayer {
    /// Layer tracing every wrapped operation with `config`
    pub fn new(provider: SinkProvider, config: TraceConfig) -> Self {
        Self { provider, config }
    }
}

impl<O: Describe> Layer<O> for EntryExitLayer {
    type Service = EntryExitTracer<O>;

    fn layer(&self, inner: O) -> Self::Service {
        EntryExitTracer::new(inner, self.provider.clone(), self.config)
    }
}
