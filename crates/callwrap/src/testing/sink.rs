//! In-memory log sink for asserting on wrapper output

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::observability::{LogEvent, LogRecord, LogSink, Severity, SinkProvider};

/// Captures every enabled record it receives
///
/// Clones share the same buffer, so a clone can be handed to a
/// [`SinkProvider`] while the test keeps the original for inspection.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    min_severity: Option<Severity>,
    records: Arc<Mutex<Vec<LogRecord>>>,
    enabled_checks: Arc<AtomicUsize>,
}

impl RecordingSink {
    /// Sink with every severity enabled
    pub fn new() -> Self {
        Self::with_min_severity(Severity::Debug)
    }

    /// Sink keeping only records at `min` or above
    pub fn with_min_severity(min: Severity) -> Self {
        Self {
            min_severity: Some(min),
            records: Arc::new(Mutex::new(Vec::new())),
            enabled_checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sink with every severity disabled
    pub fn disabled() -> Self {
        Self { min_severity: None, ..Self::new() }
    }

    /// Provider handing out this sink
    pub fn provider(&self) -> SinkProvider {
        SinkProvider::fixed(self.clone())
    }

    /// Snapshot of captured records
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Events of captured records, in order
    pub fn events(&self) -> Vec<LogEvent> {
        self.records.lock().iter().map(|r| r.event).collect()
    }

    /// Captured records of one event kind
    pub fn records_for(&self, event: LogEvent) -> Vec<LogRecord> {
        self.records.lock().iter().filter(|r| r.event == event).cloned().collect()
    }

    /// Number of [`LogSink::enabled`] queries received
    pub fn enabled_checks(&self) -> usize {
        self.enabled_checks.load(Ordering::SeqCst)
    }

    /// Drop captured records
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for RecordingSink {
    fn enabled(&self, severity: Severity) -> bool {
        self.enabled_checks.fetch_add(1, Ordering::SeqCst);
        self.min_severity.is_some_and(|min| severity >= min)
    }

    fn emit(&self, record: &LogRecord) {
        if self.min_severity.is_some_and(|min| record.severity >= min) {
            self.records.lock().push(record.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for testing::sink.
    use std::borrow::Cow;

    use super::*;

    fn record(severity: Severity) -> LogRecord {
        LogRecord::new(severity, LogEvent::Entering, Cow::Borrowed("op"), "ENTERING: op()")
    }

    /// Validates severity filtering of captured records.
    #[test]
    fn test_min_severity_filters() {
        let sink = RecordingSink::with_min_severity(Severity::Warning);

        assert!(!sink.enabled(Severity::Info));
        assert!(sink.enabled(Severity::Error));

        sink.emit(&record(Severity::Debug));
        sink.emit(&record(Severity::Warning));

        assert_eq!(sink.records().len(), 1);
        assert_eq!(sink.enabled_checks(), 2);
    }

    /// Validates a disabled sink captures nothing.
    #[test]
    fn test_disabled_sink() {
        let sink = RecordingSink::disabled();
        assert!(!sink.enabled(Severity::Error));
        sink.emit(&record(Severity::Error));
        assert!(sink.records().is_empty());
    }

    /// Validates clones share the buffer and `clear` empties it.
    #[test]
    fn test_clones_share_buffer() {
        let sink = RecordingSink::new();
        let provider = sink.provider();

        provider.sink().emit(&record(Severity::Info));
        assert_eq!(sink.events(), vec![LogEvent::Entering]);

        sink.clear();
        assert!(sink.records().is_empty());
    }
}
