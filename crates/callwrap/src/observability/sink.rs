//! Logging sink abstraction
//!
//! Wrappers never log through a global directly. They ask a [`SinkProvider`]
//! for a [`LogSink`] at call time, check [`LogSink::enabled`] before doing any
//! formatting work, and hand a structured [`LogRecord`] to [`LogSink::emit`].
//! [`TracingSink`] forwards records to the `tracing` ecosystem and is the
//! default everywhere.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Per-attempt detail and entry/exit tracing
    Debug,
    /// Recovery after retries
    Info,
    /// First failure of a retried call
    Warning,
    /// Exhausted budgets and unhandled failures
    Error,
}

impl Severity {
    /// The `tracing` level this severity is emitted at
    pub fn as_level(self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// What a log record reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogEvent {
    /// A retried operation eventually succeeded
    RetryRecovered,
    /// A retryable failure was vetoed by the retry filter predicate
    RetryFiltered,
    /// The retry timeout budget was exhausted
    RetryExhausted,
    /// First failure of a call; a retry follows
    FirstFailure,
    /// Second or later failure of a call; a retry follows
    RepeatedFailure,
    /// A failure left an exception-logged operation
    UnhandledFailure,
    /// An entry/exit traced operation is about to run
    Entering,
    /// An entry/exit traced operation has returned
    Leaving,
}

impl LogEvent {
    /// Stable identifier, used as the `event` field in structured output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RetryRecovered => "retry_recovered",
            Self::RetryFiltered => "retry_filtered",
            Self::RetryExhausted => "retry_exhausted",
            Self::FirstFailure => "first_failure",
            Self::RepeatedFailure => "repeated_failure",
            Self::UnhandledFailure => "unhandled_failure",
            Self::Entering => "entering",
            Self::Leaving => "leaving",
        }
    }
}

/// A structured record emitted by one of the wrappers
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Severity the record is emitted at
    pub severity: Severity,
    /// Kind of event
    pub event: LogEvent,
    /// Name of the base operation
    pub operation: Cow<'static, str>,
    /// Correlation label (retry wrapper only)
    pub label: Option<String>,
    /// Human-readable message
    pub message: String,
    /// Attempt number the record refers to
    pub attempt: Option<u32>,
    /// Delay before the next attempt
    pub delay: Option<Duration>,
    /// Time elapsed in the retry window
    pub elapsed: Option<Duration>,
    /// Debug representation of the failure
    pub failure: Option<String>,
    /// Stack snapshot taken where the record was produced
    pub stack: Option<String>,
}

impl LogRecord {
    /// Create a record with no optional fields set
    pub fn new(
        severity: Severity,
        event: LogEvent,
        operation: Cow<'static, str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            event,
            operation,
            label: None,
            message: message.into(),
            attempt: None,
            delay: None,
            elapsed: None,
            failure: None,
            stack: None,
        }
    }

    /// Attach a correlation label; empty labels are dropped
    pub fn with_label(mut self, label: &str) -> Self {
        if !label.is_empty() {
            self.label = Some(label.to_string());
        }
        self
    }

    /// Attach an attempt number
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    /// Attach the delay before the next attempt
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Attach the elapsed retry window
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Attach the failure representation
    pub fn with_failure(mut self, failure: impl fmt::Debug) -> Self {
        self.failure = Some(format!("{failure:?}"));
        self
    }

    /// Attach a stack snapshot
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack;
        self
    }
}

/// Leveled destination for wrapper log records
pub trait LogSink: Send + Sync {
    /// Whether records at `severity` would be kept
    fn enabled(&self, severity: Severity) -> bool;

    /// Emit a record
    fn emit(&self, record: &LogRecord);
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn enabled(&self, severity: Severity) -> bool {
        (**self).enabled(severity)
    }

    fn emit(&self, record: &LogRecord) {
        (**self).emit(record);
    }
}

/// Sink that forwards records to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

fn millis(duration: Option<Duration>) -> Option<u64> {
    duration.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

macro_rules! emit_record {
    ($macro:ident, $record:expr) => {
        tracing::$macro!(
            operation = %$record.operation,
            label = $record.label.as_deref(),
            event = $record.event.as_str(),
            attempt = $record.attempt,
            delay_ms = millis($record.delay),
            elapsed_ms = millis($record.elapsed),
            failure = $record.failure.as_deref(),
            stack = $record.stack.as_deref(),
            "{}",
            $record.message
        )
    };
}

impl LogSink for TracingSink {
    fn enabled(&self, severity: Severity) -> bool {
        match severity {
            Severity::Debug => tracing::enabled!(Level::DEBUG),
            Severity::Info => tracing::enabled!(Level::INFO),
            Severity::Warning => tracing::enabled!(Level::WARN),
            Severity::Error => tracing::enabled!(Level::ERROR),
        }
    }

    fn emit(&self, record: &LogRecord) {
        match record.severity {
            Severity::Debug => emit_record!(debug, record),
            Severity::Info => emit_record!(info, record),
            Severity::Warning => emit_record!(warn, record),
            Severity::Error => emit_record!(error, record),
        }
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl LogSink for NoOpSink {
    fn enabled(&self, _severity: Severity) -> bool {
        false
    }

    fn emit(&self, _record: &LogRecord) {}
}

type SinkFactory = dyn Fn() -> Arc<dyn LogSink> + Send + Sync;

/// Supplies the sink a wrapper logs to, resolved lazily at call time
///
/// Providers are cheap to clone. The factory runs each time a wrapper needs
/// to log, so a sink can be swapped (for example between test and
/// production) without rebuilding the wrapped operation.
#[derive(Clone)]
pub struct SinkProvider {
    factory: Arc<SinkFactory>,
}

impl SinkProvider {
    /// Provider calling `factory` on every lookup
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<dyn LogSink> + Send + Sync + 'static,
    {
        Self { factory: Arc::new(factory) }
    }

    /// Provider that always hands out the same sink
    pub fn fixed<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        let sink: Arc<dyn LogSink> = Arc::new(sink);
        Self::new(move || Arc::clone(&sink))
    }

    /// Provider for [`TracingSink`]
    pub fn tracing() -> Self {
        Self::fixed(TracingSink)
    }

    /// Provider for [`NoOpSink`]
    pub fn disabled() -> Self {
        Self::fixed(NoOpSink)
    }

    /// Resolve the sink
    pub fn sink(&self) -> Arc<dyn LogSink> {
        (self.factory)()
    }
}

impl Default for SinkProvider {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for SinkProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SinkProvider(<factory>)")
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for observability::sink.
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::testing::RecordingSink;

    /// Validates `Severity` ordering and level mapping.
    #[test]
    fn test_severity_ordering_and_levels() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);

        assert_eq!(Severity::Debug.as_level(), Level::DEBUG);
        assert_eq!(Severity::Warning.as_level(), Level::WARN);
        assert_eq!(Severity::Error.to_string(), "error");
    }

    /// Validates `LogRecord` builder methods.
    ///
    /// Assertions:
    /// - Confirms an empty label is dropped.
    /// - Confirms the failure is stored as its debug representation.
    #[test]
    fn test_log_record_builder() {
        let record = LogRecord::new(
            Severity::Warning,
            LogEvent::FirstFailure,
            Cow::Borrowed("fetch"),
            "first failure",
        )
        .with_label("")
        .with_attempt(1)
        .with_delay(Duration::from_millis(200))
        .with_failure("boom");

        assert_eq!(record.label, None);
        assert_eq!(record.attempt, Some(1));
        assert_eq!(record.delay, Some(Duration::from_millis(200)));
        assert_eq!(record.failure.as_deref(), Some("\"boom\""));

        let labelled = record.with_label("client-7");
        assert_eq!(labelled.label.as_deref(), Some("client-7"));
    }

    /// Validates the provider factory runs on every lookup.
    #[test]
    fn test_sink_provider_is_lazy() {
        let lookups = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&lookups);
        let provider = SinkProvider::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(NoOpSink) as Arc<dyn LogSink>
        });

        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        let _ = provider.sink();
        let _ = provider.clone().sink();
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    /// Validates a fixed provider hands out a shared sink.
    #[test]
    fn test_fixed_provider_shares_sink() {
        let recorder = RecordingSink::new();
        let provider = SinkProvider::fixed(recorder.clone());

        provider.sink().emit(&LogRecord::new(
            Severity::Info,
            LogEvent::RetryRecovered,
            Cow::Borrowed("op"),
            "recovered",
        ));

        assert_eq!(recorder.records().len(), 1);
    }

    /// Validates the no-op sink is never enabled.
    #[test]
    fn test_noop_sink_disabled() {
        let sink = SinkProvider::disabled().sink();
        assert!(!sink.enabled(Severity::Error));
        assert!(!sink.enabled(Severity::Debug));
    }

    /// Validates `TracingSink` reports disabled levels without a subscriber.
    #[test]
    fn test_tracing_sink_without_subscriber() {
        let sink = TracingSink;
        tracing::subscriber::with_default(tracing::subscriber::NoSubscriber::default(), || {
            assert!(!sink.enabled(Severity::Error));
        });
    }
}
