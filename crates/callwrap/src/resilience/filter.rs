//! Failure classification for the retry controller
//!
//! A caught failure goes through two stages, strictly in order:
//!
//! 1. **Kind**: is the failure's [`FailureKind`] one of the configured
//!    retryable kinds, or derived from one?
//! 2. **Predicate**: only if stage 1 passed, does the user-supplied retry
//!    filter accept the failure given the original call arguments?
//!
//! Kinds form an explicit, closed hierarchy: a kind names its parent through
//! [`FailureKind::parent`], and a kind matches a configured kind when it is
//! that kind or one of its descendants.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};

/// Category tag of a failure
///
/// The parent chain must be acyclic.
pub trait FailureKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// The kind this kind derives from, if any
    fn parent(self) -> Option<Self> {
        None
    }

    /// Whether this kind is `ancestor` or derives from it
    fn is_a(self, ancestor: Self) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

/// A failure that can be classified by kind
pub trait Failure: fmt::Debug {
    /// Kind tag type
    type Kind: FailureKind;

    /// Kind of this failure
    fn kind(&self) -> Self::Kind;
}

impl FailureKind for std::io::ErrorKind {}

impl Failure for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> Self::Kind {
        std::io::Error::kind(self)
    }
}

/// Set of failure kinds eligible for retry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindSet<K: FailureKind> {
    /// Every kind is retryable
    Any,
    /// Only these kinds (and kinds derived from them) are retryable
    Only(HashSet<K>),
}

impl<K: FailureKind> KindSet<K> {
    /// Set of the given kinds; empty input is a configuration error
    pub fn only<I>(kinds: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let kinds: HashSet<K> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(ConfigError::EmptyRetryableKinds);
        }
        Ok(Self::Only(kinds))
    }

    /// Whether `kind` is, or derives from, a member of the set
    pub fn matches(&self, kind: K) -> bool {
        match self {
            Self::Any => true,
            Self::Only(kinds) => kinds.iter().any(|member| kind.is_a(*member)),
        }
    }

    pub(crate) fn validate(&self) -> ConfigResult<()> {
        match self {
            Self::Only(kinds) if kinds.is_empty() => Err(ConfigError::EmptyRetryableKinds),
            _ => Ok(()),
        }
    }
}

impl<K: FailureKind> Default for KindSet<K> {
    fn default() -> Self {
        Self::Any
    }
}

/// Type alias for the retry filter predicate to reduce complexity
type RetryPredicate<E, A> = Arc<dyn Fn(&E, &A) -> bool + Send + Sync>;

/// Outcome of classifying a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Kind is not retryable; the predicate was not consulted
    NotRetryable,
    /// Kind is retryable but the predicate vetoed the retry
    Rejected,
    /// Retry the operation
    Retry,
}

/// Two-stage retry classification: kind membership, then predicate
pub struct RetryFilterChain<E: Failure, A> {
    kinds: KindSet<E::Kind>,
    predicate: Option<RetryPredicate<E, A>>,
}

impl<E: Failure, A> RetryFilterChain<E, A> {
    /// Chain accepting every failure
    pub fn new() -> Self {
        Self { kinds: KindSet::Any, predicate: None }
    }

    /// Restrict retries to `kinds`
    #[must_use]
    pub fn with_kinds(mut self, kinds: KindSet<E::Kind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Veto retries with `predicate`
    #[must_use]
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, &A) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Configured retryable kinds
    pub fn kinds(&self) -> &KindSet<E::Kind> {
        &self.kinds
    }

    /// Classify `error` raised by a call with `args`
    pub fn classify(&self, error: &E, args: &A) -> FilterVerdict {
        if !self.kinds.matches(error.kind()) {
            return FilterVerdict::NotRetryable;
        }
        match &self.predicate {
            Some(predicate) if !predicate(error, args) => FilterVerdict::Rejected,
            _ => FilterVerdict::Retry,
        }
    }
}

impl<E: Failure, A> Default for RetryFilterChain<E, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Failure, A> Clone for RetryFilterChain<E, A> {
    fn clone(&self) -> Self {
        Self { kinds: self.kinds.clone(), predicate: self.predicate.clone() }
    }
}

impl<E: Failure, A> fmt::Debug for RetryFilterChain<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFilterChain")
            .field("kinds", &self.kinds)
            .field("predicate", &self.predicate.as_ref().map(|_| "<function>"))
            .finish()
    }
}
