//! Timeout-bounded retry with capped exponential backoff
//!
//! [`Retry`] re-invokes the operation it wraps until it succeeds, the failure
//! is classified as not worth retrying, or the wall-clock budget runs out.
//! The budget bounds the retry window only: a single attempt is never
//! interrupted, so a call can overrun `timeout` by up to one attempt.
//!
//! Every failure the caller sees is the base operation's own error, returned
//! unchanged.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tower::Layer;

use super::attempt_log::AttemptLogger;
use super::backoff::BackoffScheduler;
use super::filter::{Failure, FilterVerdict, KindSet, RetryFilterChain};
use crate::error::{ConfigError, ConfigResult};
use crate::observability::SinkProvider;
use crate::operation::{Describe, Operation, OperationMetadata};
use crate::time::{Clock, ClockReader, Sleeper, SystemClock, ThreadSleeper};

/// Immutable retry settings for one wrapped operation
///
/// Built through [`RetryConfig::builder`] or [`RetryConfig::from_secs`];
/// every instance satisfies `initial_delay > 0` and
/// `max_delay >= initial_delay`.
pub struct RetryConfig<E: Failure, A> {
    timeout: Duration,
    initial_delay: Duration,
    max_delay: Duration,
    filter: RetryFilterChain<E, A>,
    sink_provider: SinkProvider,
    label: String,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    capture_stack: bool,
}

impl<E: Failure, A> RetryConfig<E, A> {
    /// Create a new builder with default settings
    pub fn builder() -> RetryConfigBuilder<E, A> {
        RetryConfigBuilder::new()
    }

    /// Builder seeded from durations in floating-point seconds
    ///
    /// Each value must be finite and non-negative; the remaining invariants
    /// are checked by [`RetryConfigBuilder::build`].
    pub fn from_secs(
        timeout: f64,
        initial_delay: f64,
        max_delay: f64,
    ) -> ConfigResult<RetryConfigBuilder<E, A>> {
        Ok(Self::builder()
            .timeout(secs("timeout", timeout)?)
            .initial_delay(secs("initial_delay", initial_delay)?)
            .max_delay(secs("max_delay", max_delay)?))
    }

    /// Wall-clock budget for the retry window
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay before the first retry
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Backoff ceiling
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Failure kinds eligible for retry
    pub fn retryable_kinds(&self) -> &KindSet<E::Kind> {
        self.filter.kinds()
    }

    /// Classification applied to each failure
    pub fn filter(&self) -> &RetryFilterChain<E, A> {
        &self.filter
    }

    /// Log correlation label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether failure records carry a stack snapshot
    pub fn capture_stack(&self) -> bool {
        self.capture_stack
    }

    /// Provider resolving the sink for attempt records
    pub fn sink_provider(&self) -> &SinkProvider {
        &self.sink_provider
    }
}

fn secs(field: &'static str, value: f64) -> ConfigResult<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| ConfigError::InvalidSeconds { field, value })
}

impl<E: Failure, A> Clone for RetryConfig<E, A> {
    fn clone(&self) -> Self {
        Self {
            timeout: self.timeout,
            initial_delay: self.initial_delay,
            max_delay: self.max_delay,
            filter: self.filter.clone(),
            sink_provider: self.sink_provider.clone(),
            label: self.label.clone(),
            clock: Arc::clone(&self.clock),
            sleeper: Arc::clone(&self.sleeper),
            capture_stack: self.capture_stack,
        }
    }
}

impl<E: Failure, A> fmt::Debug for RetryConfig<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("timeout", &self.timeout)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("filter", &self.filter)
            .field("label", &self.label)
            .field("capture_stack", &self.capture_stack)
            .finish_non_exhaustive()
    }
}

/// Builder for RetryConfig with fluent API
pub struct RetryConfigBuilder<E: Failure, A> {
    config: RetryConfig<E, A>,
}

impl<E: Failure, A> Default for RetryConfigBuilder<E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Failure, A> RetryConfigBuilder<E, A> {
    /// Defaults: 30s timeout, 100ms initial delay, 30s ceiling, every kind
    /// retryable, tracing sink, system clock, stack capture on
    pub fn new() -> Self {
        Self {
            config: RetryConfig {
                timeout: Duration::from_secs(30),
                initial_delay: Duration::from_millis(100),
                max_delay: Duration::from_secs(30),
                filter: RetryFilterChain::new(),
                sink_provider: SinkProvider::default(),
                label: String::new(),
                clock: Arc::new(SystemClock),
                sleeper: Arc::new(ThreadSleeper),
                capture_stack: true,
            },
        }
    }

    /// Set the wall-clock budget for the retry window
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the delay before the first retry (must be non-zero)
    #[must_use]
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    /// Set the backoff ceiling
    #[must_use]
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.config.max_delay = delay;
        self
    }

    /// Restrict retries to these failure kinds and their descendants
    #[must_use]
    pub fn retryable_kinds(mut self, kinds: KindSet<E::Kind>) -> Self {
        self.config.filter = self.config.filter.with_kinds(kinds);
        self
    }

    /// Veto retries of otherwise retryable failures; receives the failure and
    /// the arguments of the failed call
    #[must_use]
    pub fn retry_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&E, &A) -> bool + Send + Sync + 'static,
    {
        self.config.filter = self.config.filter.with_predicate(filter);
        self
    }

    /// Set where attempt records are sent
    #[must_use]
    pub fn sink_provider(mut self, provider: SinkProvider) -> Self {
        self.config.sink_provider = provider;
        self
    }

    /// Set the correlation label prefixed to attempt messages
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = label.into();
        self
    }

    /// Set the clock the retry budget is measured against
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.config.clock = Arc::new(clock);
        self
    }

    /// Set the sleeper blocking between attempts
    #[must_use]
    pub fn sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.config.sleeper = Arc::new(sleeper);
        self
    }

    /// Attach stack snapshots to failure records
    #[must_use]
    pub fn capture_stack(mut self, capture: bool) -> Self {
        self.config.capture_stack = capture;
        self
    }

    /// Validate and build
    pub fn build(self) -> ConfigResult<RetryConfig<E, A>> {
        let config = self.config;
        if config.initial_delay.is_zero() {
            return Err(ConfigError::NonPositiveInitialDelay {
                initial_delay: config.initial_delay,
            });
        }
        if config.max_delay < config.initial_delay {
            return Err(ConfigError::MaxDelayBelowInitial {
                max_delay: config.max_delay,
                initial_delay: config.initial_delay,
            });
        }
        config.filter.kinds().validate()?;
        Ok(config)
    }
}

impl<E: Failure, A> fmt::Debug for RetryConfigBuilder<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfigBuilder").field("config", &self.config).finish()
    }
}

/// Per-call retry state
#[derive(Debug, Clone)]
pub struct AttemptState {
    /// Invocations made so far
    pub attempts: u32,
    /// Delay before the next retry
    pub current_delay: Duration,
    /// Wall-clock start of the retry window; moves back with the clock
    pub start: SystemTime,
    /// Sum of delays slept
    pub total_delay: Duration,
    /// Elapsed time at the last budget check
    pub elapsed: Duration,
}

impl AttemptState {
    fn new(initial_delay: Duration, start: SystemTime) -> Self {
        Self {
            attempts: 0,
            current_delay: initial_delay,
            start,
            total_delay: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    fn finish<T, E>(self, result: Result<T, E>) -> RetryOutcome<T, E> {
        RetryOutcome {
            result,
            attempts: self.attempts,
            total_delay: self.total_delay,
            elapsed: self.elapsed,
        }
    }
}

/// Outcome of a retried call including summary statistics
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Result of the last attempt
    pub result: Result<T, E>,
    /// Invocations made, including the first
    pub attempts: u32,
    /// Sum of delays slept between attempts
    pub total_delay: Duration,
    /// Wall-clock time elapsed at the last budget check (zero when the
    /// budget was never consulted)
    pub elapsed: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Consume the outcome and return only the result.
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }

    /// Number of retries after the first attempt
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    /// Get the average delay between attempts
    pub fn average_delay(&self) -> Duration {
        if self.attempts <= 1 {
            return Duration::ZERO;
        }
        self.total_delay / (self.attempts - 1)
    }
}

/// Operation retried under a [`RetryConfig`]
pub struct Retry<O, E: Failure, A> {
    inner: O,
    config: Arc<RetryConfig<E, A>>,
    metadata: OperationMetadata,
}

impl<O: Describe, E: Failure, A> Retry<O, E, A> {
    /// Wrap `inner`, copying its metadata
    pub fn new(inner: O, config: RetryConfig<E, A>) -> Self {
        Self::with_shared(inner, Arc::new(config))
    }

    pub(crate) fn with_shared(inner: O, config: Arc<RetryConfig<E, A>>) -> Self {
        let metadata = inner.metadata().clone();
        Self { inner, config, metadata }
    }
}

impl<O, E: Failure, A> Retry<O, E, A> {
    /// Retry settings
    pub fn config(&self) -> &RetryConfig<E, A> {
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

impl<O, E, A> Retry<O, E, A>
where
    O: Operation<A, Error = E>,
    E: Failure,
    A: Clone,
{
    /// Run the retry loop and report statistics alongside the result
    pub fn call_with_outcome(&self, args: A) -> RetryOutcome<O::Output, E> {
        let config = &*self.config;
        let logger = AttemptLogger::new(
            &config.sink_provider,
            &self.metadata,
            &config.label,
            config.timeout,
            config.capture_stack,
        );
        let clock = ClockReader::new(Arc::clone(&config.clock));
        let backoff = BackoffScheduler::new(config.max_delay);
        let mut state = AttemptState::new(config.initial_delay, clock.now());

        loop {
            state.attempts += 1;

            let error = match self.inner.call(args.clone()) {
                Ok(value) => {
                    if state.attempts > 1 {
                        logger.recovered(state.attempts);
                    }
                    return state.finish(Ok(value));
                }
                Err(error) => error,
            };

            match config.filter.classify(&error, &args) {
                FilterVerdict::NotRetryable => return state.finish(Err(error)),
                FilterVerdict::Rejected => {
                    logger.filtered(state.attempts, &error);
                    return state.finish(Err(error));
                }
                FilterVerdict::Retry => {}
            }

            state.elapsed = clock.elapsed_since(&mut state.start);
            if state.elapsed >= config.timeout {
                logger.exhausted(state.attempts, state.elapsed, &error);
                return state.finish(Err(error));
            }

            let delay = state.current_delay;
            if state.attempts == 1 {
                logger.first_failure(delay, state.elapsed, &error);
            } else {
                logger.repeated_failure(state.attempts, delay, state.elapsed, &error);
            }

            config.sleeper.sleep(delay);
            state.total_delay = state.total_delay.saturating_add(delay);
            state.current_delay = backoff.next(delay);
        }
    }
}

impl<O, E: Failure, A> Describe for Retry<O, E, A> {
    fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }
}

impl<O, E, A> Operation<A> for Retry<O, E, A>
where
    O: Operation<A, Error = E>,
    E: Failure,
    A: Clone,
{
    type Output = O::Output;
    type Error = E;

    fn call(&self, args: A) -> Result<Self::Output, E> {
        self.call_with_outcome(args).into_result()
    }
}

impl<O: Clone, E: Failure, A> Clone for Retry<O, E, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
            metadata: self.metadata.clone(),
        }
    }
}

impl<O: fmt::Debug, E: Failure, A> fmt::Debug for Retry<O, E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}

/// [`Layer`] producing [`Retry`] wrappers sharing one configuration
pub struct RetryLayer<E: Failure, A> {
    config: Arc<RetryConfig<E, A>>,
}

impl<E: Failure, A> RetryLayer<E, A> {
    /// Layer sharing `config` across every wrapped operation
    pub fn new(config: RetryConfig<E, A>) -> Self {
        Self { config: Arc::new(config) }
    }
}

impl<O: Describe, E: Failure, A> Layer<O> for RetryLayer<E, A> {
    type Service = Retry<O, E, A>;

    fn layer(&self, inner: O) -> Self::Service {
        Retry::with_shared(inner, Arc::clone(&self.config))
    }
}

impl<E: Failure, A> Clone for RetryLayer<E, A> {
    fn clone(&self) -> Self {
        Self { config: Arc::clone(&self.config) }
    }
}

impl<E: Failure, A> fmt::Debug for RetryLayer<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryLayer").field("config", &self.config).finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for resilience::retry.
    //!
    //! Every test drives the loop with `MockClock`, which doubles as the
    //! sleeper, so delay sequences and elapsed times are exact.

    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::observability::{LogEvent, Severity};
    use crate::operation::operation;
    use crate::testing::{MockClock, RecordingSink};

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn transient() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "transient")
    }

    fn builder<A>(clock: &MockClock, sink: &RecordingSink) -> RetryConfigBuilder<io::Error, A> {
        RetryConfig::from_secs(1.0, 0.2, 1.0)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .sink_provider(sink.provider())
            .capture_stack(false)
    }

    /// Validates a first-try success neither sleeps nor logs.
    #[test]
    fn test_success_first_attempt() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let op = Retry::new(
            operation("ok", |n: u32| Ok::<_, io::Error>(n + 1)),
            builder(&clock, &sink).build().unwrap(),
        );

        let outcome = op.call_with_outcome(41);

        assert_eq!(outcome.result.unwrap(), 42);
        assert_eq!(outcome.attempts, 1);
        assert!(clock.sleeps().is_empty());
        assert!(sink.records().is_empty());
    }

    /// Validates recovery after two transient failures.
    ///
    /// Assertions:
    /// - Confirms the result is `Ok(42)` after exactly 3 invocations.
    /// - Confirms sleeps of 200ms then 400ms.
    /// - Confirms warning, debug, then info records.
    #[test]
    fn test_recovers_after_transient_failures() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let op = Retry::new(
            operation("flaky", move |()| {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(transient())
                } else {
                    Ok(42)
                }
            }),
            builder(&clock, &sink).build().unwrap(),
        );

        assert_eq!(op.call(()).unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(clock.sleeps(), vec![ms(200), ms(400)]);
        assert_eq!(
            sink.events(),
            vec![LogEvent::FirstFailure, LogEvent::RepeatedFailure, LogEvent::RetryRecovered]
        );

        let records = sink.records();
        assert_eq!(records[0].severity, Severity::Warning);
        assert_eq!(records[1].severity, Severity::Debug);
        assert_eq!(records[2].severity, Severity::Info);
        assert!(records[2].message.contains("succeeded on attempt #3"));
    }

    /// Validates the budget is enforced for an always-failing operation.
    ///
    /// Assertions:
    /// - Confirms sleeps of 200ms, 400ms and 800ms, then 4 attempts.
    /// - Confirms the last failure is returned unchanged.
    /// - Confirms the exhaustion record reports 1.4s elapsed.
    #[test]
    fn test_exhausts_timeout() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let op = Retry::new(
            operation("down", |()| Err::<(), _>(transient())),
            builder(&clock, &sink).build().unwrap(),
        );

        let outcome = op.call_with_outcome(());

        let error = outcome.result.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::TimedOut);
        assert_eq!(error.to_string(), "transient");
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.total_delay, ms(1_400));
        assert_eq!(outcome.elapsed, ms(1_400));
        assert_eq!(clock.sleeps(), vec![ms(200), ms(400), ms(800)]);

        let exhausted = sink.records_for(LogEvent::RetryExhausted);
        assert_eq!(exhausted.len(), 1);
        assert_eq!(exhausted[0].severity, Severity::Error);
        assert_eq!(exhausted[0].attempt, Some(4));
        assert_eq!(exhausted[0].elapsed, Some(ms(1_400)));
    }

    /// Validates non-retryable kinds return at once without logging or
    /// consulting the predicate.
    #[test]
    fn test_non_retryable_kind_returns_immediately() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let consulted = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&consulted);
        let config = builder(&clock, &sink)
            .retryable_kinds(KindSet::only([io::ErrorKind::TimedOut]).unwrap())
            .retry_filter(move |_, _: &()| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            })
            .build()
            .unwrap();
        let op = Retry::new(
            operation("denied", |()| {
                Err::<(), _>(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            }),
            config,
        );

        let outcome = op.call_with_outcome(());

        assert_eq!(outcome.result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(consulted.load(Ordering::SeqCst), 0);
        assert!(clock.sleeps().is_empty());
        assert!(sink.records().is_empty());
    }

    /// Validates a predicate veto stops retrying with a debug record.
    #[test]
    fn test_retry_filter_rejects() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let config = builder(&clock, &sink)
            .label("jobs")
            .retry_filter(|_error: &io::Error, job_id: &u32| *job_id != 7)
            .build()
            .unwrap();
        let op = Retry::new(operation("run_job", |_: u32| Err::<(), _>(transient())), config);

        assert!(op.call(7).is_err());

        assert!(clock.sleeps().is_empty());
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event, LogEvent::RetryFiltered);
        assert_eq!(records[0].severity, Severity::Debug);
        assert_eq!(records[0].label.as_deref(), Some("jobs"));
        assert!(records[0].message.starts_with("[jobs] Failure in run_job"));
    }

    /// Validates a zero timeout means exactly one attempt.
    #[test]
    fn test_zero_timeout_single_attempt() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let config = RetryConfig::<io::Error, ()>::from_secs(0.0, 0.2, 1.0)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .sink_provider(sink.provider())
            .build()
            .unwrap();
        let op = Retry::new(operation("once", |()| Err::<(), _>(transient())), config);

        let outcome = op.call_with_outcome(());

        assert_eq!(outcome.attempts, 1);
        assert!(clock.sleeps().is_empty());
        assert_eq!(sink.events(), vec![LogEvent::RetryExhausted]);
        assert!(sink.records()[0].stack.is_some());
    }

    /// Validates a backward wall-clock jump restarts the budget.
    ///
    /// The clock is rewound 5s during the third attempt, so the window
    /// restarts at that reading and two more attempts fit in the budget.
    #[test]
    fn test_backward_clock_jump_restarts_budget() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let skewed = clock.clone();
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let op = Retry::new(
            operation("skewed", move |()| {
                if counter.fetch_add(1, Ordering::SeqCst) == 2 {
                    skewed.rewind(Duration::from_secs(5));
                }
                Err::<(), _>(transient())
            }),
            builder(&clock, &sink).build().unwrap(),
        );

        let outcome = op.call_with_outcome(());

        assert_eq!(outcome.attempts, 5);
        assert_eq!(clock.sleeps(), vec![ms(200), ms(400), ms(800), ms(1_000)]);
        assert_eq!(outcome.elapsed, ms(1_800));
    }

    /// Validates the sink only sees records once the severity is enabled.
    #[test]
    fn test_disabled_sink_still_retries() {
        let clock = MockClock::new();
        let sink = RecordingSink::disabled();
        let op = Retry::new(
            operation("down", |()| Err::<(), _>(transient())),
            builder(&clock, &sink).build().unwrap(),
        );

        assert!(op.call(()).is_err());
        assert_eq!(clock.sleeps().len(), 3);
        assert!(sink.records().is_empty());
        assert_eq!(sink.enabled_checks(), 4);
    }

    /// Validates the wrapper exposes the base operation's metadata.
    #[test]
    fn test_metadata_copied() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let base = operation("fetch", |()| Ok::<_, io::Error>(())).with_doc("Fetches a page");
        let op = Retry::new(base, builder::<()>(&clock, &sink).build().unwrap());

        assert_eq!(op.metadata().name(), "fetch");
        assert_eq!(op.metadata().doc(), Some("Fetches a page"));
    }

    /// Validates the layer shares one configuration across wrappers.
    #[test]
    fn test_layer_wraps() {
        let clock = MockClock::new();
        let sink = RecordingSink::new();
        let layer = RetryLayer::new(builder::<()>(&clock, &sink).build().unwrap());

        let first = layer.layer(operation("a", |()| Ok::<_, io::Error>(1)));
        let second = layer.clone().layer(operation("b", |()| Ok::<_, io::Error>(2)));

        assert_eq!(first.call(()).unwrap() + second.call(()).unwrap(), 3);
        assert_eq!(second.metadata().name(), "b");
        assert_eq!(first.config().timeout(), Duration::from_secs(1));
    }

    /// Validates builder validation.
    ///
    /// Assertions:
    /// - Confirms a zero initial delay is rejected.
    /// - Confirms a ceiling below the initial delay is rejected.
    /// - Confirms negative and NaN seconds are rejected.
    /// - Confirms an empty explicit kind set is rejected.
    #[test]
    fn test_builder_validation() {
        let err = RetryConfig::<io::Error, ()>::builder()
            .initial_delay(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "initial_delay");

        let err = RetryConfig::<io::Error, ()>::from_secs(1.0, 0.5, 0.1)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MaxDelayBelowInitial { max_delay: ms(100), initial_delay: ms(500) }
        );

        let err = RetryConfig::<io::Error, ()>::from_secs(-1.0, 0.2, 1.0).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSeconds { field: "timeout", value: -1.0 });
        let err = RetryConfig::<io::Error, ()>::from_secs(1.0, f64::NAN, 1.0).unwrap_err();
        assert_eq!(err.field(), "initial_delay");

        let err = RetryConfig::<io::Error, ()>::builder()
            .retryable_kinds(KindSet::Only(Default::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyRetryableKinds);
    }

    /// Validates builder defaults.
    #[test]
    fn test_builder_defaults() {
        let config = RetryConfig::<io::Error, ()>::builder().build().unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.initial_delay(), ms(100));
        assert_eq!(config.max_delay(), Duration::from_secs(30));
        assert_eq!(config.retryable_kinds(), &KindSet::Any);
        assert_eq!(config.label(), "");
        assert!(config.capture_stack());
    }

    /// Validates outcome helpers.
    #[test]
    fn test_outcome_statistics() {
        let outcome: RetryOutcome<(), ()> =
            RetryOutcome { result: Ok(()), attempts: 3, total_delay: ms(600), elapsed: ms(600) };
        assert_eq!(outcome.retries(), 2);
        assert_eq!(outcome.average_delay(), ms(300));

        let single: RetryOutcome<(), ()> =
            RetryOutcome { result: Ok(()), attempts: 1, total_delay: ms(0), elapsed: ms(0) };
        assert_eq!(single.average_delay(), Duration::ZERO);
    }
}
