//! Log-and-return for failures leaving an operation

use std::fmt;

use tower::Layer;

use crate::observability::{caller_stack, LogEvent, LogRecord, Severity, SinkProvider};
use crate::operation::{Describe, Operation, OperationMetadata};

/// Logs every failure of the wrapped operation at error severity, then
/// returns it unchanged
///
/// The operation runs exactly once per call; successes pass through
/// untouched. A stack snapshot is attached when error records are enabled.
#[derive(Clone)]
pub struct ExceptionLogger<O> {
    inner: O,
    provider: SinkProvider,
    metadata: OperationMetadata,
}

impl<O: Describe> ExceptionLogger<O> {
    /// Wrap `inner`, copying its metadata
    pub fn new(inner: O, provider: SinkProvider) -> Self {
        let metadata = inner.metadata().clone();
        Self { inner, provider, metadata }
    }
}

impl<O> ExceptionLogger<O> {
    /// The wrapped operation
    pub fn get_ref(&self) -> &O {
        &self.inner
    }

    /// Unwrap the inner operation
    pub fn into_inner(self) -> O {
        self.inner
    }

    fn log_failure(&self, failure: &dyn fmt::Debug) {
        let sink = self.provider.sink();
        if !sink.enabled(Severity::Error) {
            return;
        }
        let message = format!("Unhandled failure {failure:?} from {}", self.metadata);
        let record = LogRecord::new(
            Severity::Error,
            LogEvent::UnhandledFailure,
            self.metadata.name_cow(),
            message,
        )
        .with_failure(failure)
        .with_stack(Some(caller_stack()));
        sink.emit(&record);
    }
}

impl<O> Describe for ExceptionLogger<O> {
    fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }
}

impl<O, A> Operation<A> for ExceptionLogger<O>
where
    O: Operation<A>,
    O::Error: fmt::Debug,
{
    type Output = O::Output;
    type Error = O::Error;

    fn call(&self, args: A) -> Result<Self::Output, Self::Error> {
        self.inner.call(args).inspect_err(|failure| self.log_failure(failure))
    }
}

impl<O: fmt::Debug> fmt::Debug for ExceptionLogger<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionLogger")
            .field("inner", &self.inner)
            .field("provider", &self.provider)
            .finish()
    }
}

/// [`Layer`] producing [`ExceptionLogger`] wrappers
#[derive(Debug, Clone, Default)]
pub struct ExceptionLoggingLayer {
    provider: SinkProvider,
}

impl ExceptionLoggingLayer {
    /// Layer logging failures to the sink `provider` resolves
    pub fn new(provider: SinkProvider) -> Self {
        Self { provider }
    }
}

impl<O: Describe> Layer<O> for ExceptionLoggingLayer {
    type Service = ExceptionLogger<O>;

    fn layer(&self, inner: O) -> Self::Service {
        ExceptionLogger::new(inner, self.provider.clone())
    }
}
