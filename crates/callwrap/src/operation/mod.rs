//! Operation abstraction shared by every wrapper
//!
//! An [`Operation`] is a fallible call from an argument value `A` to
//! `Result<Output, Error>`, plus [`OperationMetadata`] describing it. Wrappers
//! take an operation and return another operation with the same argument,
//! output and error types. Each wrapper copies the metadata of the operation
//! it wraps, so however deeply a base operation is wrapped, its name and
//! documentation stay visible to diagnostics and to further wrapping.
//!
//! Multi-argument operations take a tuple.

use std::borrow::Cow;
use std::fmt;

/// Descriptive metadata of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationMetadata {
    name: Cow<'static, str>,
    doc: Option<Cow<'static, str>>,
}

impl OperationMetadata {
    /// Metadata with a name and no documentation
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into(), doc: None }
    }

    /// Attach documentation
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Operation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operation name as an owned-or-static string, for log records
    pub(crate) fn name_cow(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    /// Operation documentation, if any
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl fmt::Display for OperationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Access to an operation's metadata
///
/// Kept separate from [`Operation`] so metadata can be read without naming
/// the argument type.
pub trait Describe {
    /// Metadata describing this operation
    fn metadata(&self) -> &OperationMetadata;
}

/// A fallible operation taking `A`
pub trait Operation<A>: Describe {
    /// Success value
    type Output;
    /// Failure value
    type Error;

    /// Invoke the operation
    fn call(&self, args: A) -> Result<Self::Output, Self::Error>;
}

impl<T: Describe + ?Sized> Describe for &T {
    fn metadata(&self) -> &OperationMetadata {
        (**self).metadata()
    }
}

impl<T: Operation<A> + ?Sized, A> Operation<A> for &T {
    type Output = T::Output;
    type Error = T::Error;

    fn call(&self, args: A) -> Result<Self::Output, Self::Error> {
        (**self).call(args)
    }
}

/// Base operation built from a closure or function
#[derive(Clone)]
pub struct FnOperation<F> {
    f: F,
    metadata: OperationMetadata,
}

impl<F> FnOperation<F> {
    /// Wrap `f` under the given name
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { f, metadata: OperationMetadata::new(name) }
    }

    /// Attach documentation
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<Cow<'static, str>>) -> Self {
        self.metadata = self.metadata.with_doc(doc);
        self
    }
}

impl<F> Describe for FnOperation<F> {
    fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }
}

impl<F, A, T, E> Operation<A> for FnOperation<F>
where
    F: Fn(A) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn call(&self, args: A) -> Result<T, E> {
        (self.f)(args)
    }
}

impl<F> fmt::Debug for FnOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperation").field("metadata", &self.metadata).finish_non_exhaustive()
    }
}

/// Build a named base operation from a closure
///
/// ```rust
/// use callwrap::{operation, Describe, Operation};
///
/// let add = operation("add", |(a, b): (i32, i32)| Ok::<_, std::io::Error>(a + b))
///     .with_doc("Adds two numbers");
///
/// assert_eq!(add.call((2, 3)).unwrap(), 5);
/// assert_eq!(add.metadata().doc(), Some("Adds two numbers"));
/// ```
pub fn operation<F>(name: impl Into<Cow<'static, str>>, f: F) -> FnOperation<F> {
    FnOperation::new(name, f)
}
