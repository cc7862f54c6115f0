//! Per-attempt log records for the retry controller
//!
//! | Event | Severity |
//! |-------|----------|
//! | success after at least one retry | info |
//! | retry vetoed by the retry filter | debug |
//! | timeout budget exhausted | error |
//! | first failure, retrying | warning |
//! | later failure, retrying | debug |
//!
//! The sink is resolved from the provider for every record, and nothing is
//! formatted (failure representation, stack snapshot) unless the record's
//! severity is enabled.

use std::fmt;
use std::time::Duration;

use crate::observability::{caller_stack, LogEvent, LogRecord, Severity, SinkProvider};
use crate::operation::OperationMetadata;

/// Records the outcome of retry attempts for one call
pub struct AttemptLogger<'a> {
    provider: &'a SinkProvider,
    operation: &'a OperationMetadata,
    label: &'a str,
    timeout: Duration,
    capture_stack: bool,
}

impl<'a> AttemptLogger<'a> {
    /// Logger for calls of `operation` under the given retry settings
    pub fn new(
        provider: &'a SinkProvider,
        operation: &'a OperationMetadata,
        label: &'a str,
        timeout: Duration,
        capture_stack: bool,
    ) -> Self {
        Self { provider, operation, label, timeout, capture_stack }
    }

    /// The call succeeded on attempt `attempts` (> 1)
    pub fn recovered(&self, attempts: u32) {
        self.emit(Severity::Info, LogEvent::RetryRecovered, false, || {
            let message = format!(
                "[{}] {} succeeded on attempt #{}",
                self.label, self.operation, attempts
            );
            (message, attempts, None, None, None)
        });
    }

    /// A retryable failure was vetoed by the retry filter
    pub fn filtered(&self, attempts: u32, failure: &dyn fmt::Debug) {
        self.emit(Severity::Debug, LogEvent::RetryFiltered, true, || {
            let message = format!(
                "[{}] Failure in {}; retries aborted by retry filter",
                self.label, self.operation
            );
            (message, attempts, None, None, Some(format!("{failure:?}")))
        });
    }

    /// The timeout budget ran out; the failure is returned to the caller
    pub fn exhausted(&self, attempts: u32, elapsed: Duration, failure: &dyn fmt::Debug) {
        self.emit(Severity::Error, LogEvent::RetryExhausted, true, || {
            let message = format!(
                "[{}] Exhausted retry timeout ({:?}; {} attempts; {:?} elapsed) for {}",
                self.label, self.timeout, attempts, elapsed, self.operation
            );
            (message, attempts, None, Some(elapsed), Some(format!("{failure:?}")))
        });
    }

    /// First failure of the call; retrying after `delay`
    pub fn first_failure(&self, delay: Duration, elapsed: Duration, failure: &dyn fmt::Debug) {
        self.emit(Severity::Warning, LogEvent::FirstFailure, true, || {
            let message = format!(
                "[{}] First failure in {}; initial retry in {:?}; timeout={:?}",
                self.label, self.operation, delay, self.timeout
            );
            (message, 1, Some(delay), Some(elapsed), Some(format!("{failure:?}")))
        });
    }

    /// Failure number `attempts` (> 1); retrying after `delay`
    pub fn repeated_failure(
        &self,
        attempts: u32,
        delay: Duration,
        elapsed: Duration,
        failure: &dyn fmt::Debug,
    ) {
        self.emit(Severity::Debug, LogEvent::RepeatedFailure, true, || {
            let message = format!(
                "[{}] {} failed {} times; retrying in {:?}; timeout={:?}",
                self.label, self.operation, attempts, delay, self.timeout
            );
            (message, attempts, Some(delay), Some(elapsed), Some(format!("{failure:?}")))
        });
    }

    fn emit<F>(&self, severity: Severity, event: LogEvent, with_stack: bool, build: F)
    where
        F: FnOnce() -> RecordParts,
    {
        let sink = self.provider.sink();
        if !sink.enabled(severity) {
            return;
        }

        let (message, attempt, delay, elapsed, failure) = build();
        let stack = (with_stack && self.capture_stack).then(caller_stack);

        let mut record = LogRecord::new(severity, event, self.operation.name_cow(), message)
            .with_label(self.label)
            .with_attempt(attempt)
            .with_stack(stack);
        record.delay = delay;
        record.elapsed = elapsed;
        record.failure = failure;

        sink.emit(&record);
    }
}

/// Type alias for the lazily built record fields (clippy::type_complexity)
type RecordParts = (String, u32, Option<Duration>, Option<Duration>, Option<String>);

impl fmt::Debug for AttemptLogger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptLogger")
            .field("operation", &self.operation.name())
            .field("label", &self.label)
            .field("timeout", &self.timeout)
            .field("capture_stack", &self.capture_stack)
            .finish()
    }
}
