//! Three-way classification of close failures.
//!
//! Every failure raised by a release lands in exactly one class, checked in
//! this order:
//!
//! 1. **Declared**: a [`CloseError::Declared`] value, one of the kinds the
//!    closer advertises.
//! 2. **Undeclared**: a [`CloseError::Undeclared`] value, any other
//!    recoverable error.
//! 3. **Fatal**: a panic unwinding out of the release.
//!
//! Decorators intercept a prefix of that order, described by [`Breadth`].
//! Whatever lies beyond a decorator's breadth passes through untouched.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::closer::{BoxError, CloseError, Closer};

/// The class a close failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureClass {
    /// One of the closer's declared kinds.
    Declared,
    /// A recoverable error outside the declared set.
    Undeclared,
    /// A panic.
    Fatal,
}

impl FailureClass {
    fn rank(self) -> u8 {
        match self {
            FailureClass::Declared => 0,
            FailureClass::Undeclared => 1,
            FailureClass::Fatal => 2,
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureClass::Declared => "declared",
            FailureClass::Undeclared => "undeclared",
            FailureClass::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// How many failure classes a decorator intercepts.
///
/// Breadths are ordered: each one intercepts everything the narrower ones
/// do, plus one more class.
///
/// ```rust
/// use closer::{Breadth, FailureClass};
///
/// assert!(Breadth::Recoverable.intercepts(FailureClass::Declared));
/// assert!(Breadth::Recoverable.intercepts(FailureClass::Undeclared));
/// assert!(!Breadth::Recoverable.intercepts(FailureClass::Fatal));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Breadth {
    /// Declared kinds only.
    Declared,
    /// Declared kinds and undeclared recoverable errors.
    Recoverable,
    /// Everything, panics included.
    Fatal,
}

impl Breadth {
    /// Whether a failure of `class` is intercepted at this breadth.
    pub fn intercepts(self, class: FailureClass) -> bool {
        let widest = match self {
            Breadth::Declared => FailureClass::Declared,
            Breadth::Recoverable => FailureClass::Undeclared,
            Breadth::Fatal => FailureClass::Fatal,
        };
        class.rank() <= widest.rank()
    }
}

/// The payload of a panic caught while closing.
pub struct Panic {
    payload: Box<dyn Any + Send + 'static>,
}

impl Panic {
    /// Wrap a payload returned by [`std::panic::catch_unwind`].
    pub fn new(payload: Box<dyn Any + Send + 'static>) -> Self {
        Panic { payload }
    }

    /// The panic message, when the payload is a `&str` or `String`.
    pub fn message(&self) -> Option<&str> {
        if let Some(s) = self.payload.downcast_ref::<&'static str>() {
            Some(*s)
        } else {
            self.payload.downcast_ref::<String>().map(String::as_str)
        }
    }

    /// Borrow the raw payload.
    pub fn payload(&self) -> &(dyn Any + Send) {
        &*self.payload
    }

    /// Take the raw payload.
    pub fn into_payload(self) -> Box<dyn Any + Send + 'static> {
        self.payload
    }

    /// Continue unwinding with the original payload.
    pub fn resume(self) -> ! {
        panic::resume_unwind(self.payload)
    }
}

impl fmt::Debug for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panic")
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(msg) => write!(f, "panicked: {}", msg),
            None => f.write_str("panicked with a non-string payload"),
        }
    }
}

impl StdError for Panic {}

/// A classified close failure.
///
/// This is what fatal-breadth decorators and rethrow observers see.
#[derive(Debug)]
pub enum Failure<D> {
    /// One of the closer's declared kinds.
    Declared(D),
    /// A recoverable error outside the declared set.
    Undeclared(BoxError),
    /// A panic raised by the release.
    Fatal(Panic),
}

impl<D> Failure<D> {
    /// The single class this failure belongs to.
    pub fn class(&self) -> FailureClass {
        match self {
            Failure::Declared(_) => FailureClass::Declared,
            Failure::Undeclared(_) => FailureClass::Undeclared,
            Failure::Fatal(_) => FailureClass::Fatal,
        }
    }

    /// Returns `true` for a panic.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Failure::Fatal(_))
    }

    /// Borrow the declared value, if any.
    pub fn declared(&self) -> Option<&D> {
        match self {
            Failure::Declared(d) => Some(d),
            _ => None,
        }
    }

    /// Borrow the panic, if any.
    pub fn panic(&self) -> Option<&Panic> {
        match self {
            Failure::Fatal(p) => Some(p),
            _ => None,
        }
    }

    /// Downcast an undeclared error to a concrete type.
    pub fn downcast_undeclared_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match self {
            Failure::Undeclared(e) => e.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Split into the recoverable part or the panic.
    pub fn into_close_error(self) -> Result<CloseError<D>, Panic> {
        match self {
            Failure::Declared(d) => Ok(CloseError::Declared(d)),
            Failure::Undeclared(e) => Ok(CloseError::Undeclared(e)),
            Failure::Fatal(p) => Err(p),
        }
    }

    /// Raise this failure again, unchanged.
    ///
    /// Recoverable failures come back as `Err`; a panic resumes unwinding
    /// with its original payload.
    pub fn raise(self) -> Result<(), CloseError<D>> {
        match self.into_close_error() {
            Ok(err) => Err(err),
            Err(panic) => panic.resume(),
        }
    }
}

impl<D> From<CloseError<D>> for Failure<D> {
    fn from(err: CloseError<D>) -> Self {
        match err {
            CloseError::Declared(d) => Failure::Declared(d),
            CloseError::Undeclared(e) => Failure::Undeclared(e),
        }
    }
}

impl<D: fmt::Display> fmt::Display for Failure<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Declared(d) => d.fmt(f),
            Failure::Undeclared(e) => e.fmt(f),
            Failure::Fatal(p) => p.fmt(f),
        }
    }
}

impl<D: StdError + 'static> StdError for Failure<D> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Failure::Declared(d) => d.source(),
            Failure::Undeclared(e) => e.source(),
            Failure::Fatal(_) => None,
        }
    }
}

/// Run one release and classify whatever it raises.
///
/// The closer is called exactly once. A panic is caught and reported as
/// [`Failure::Fatal`]; interception requires `panic = "unwind"`.
///
/// ```rust
/// use closer::{catch, CloseError, FailureClass};
///
/// let mut closer = || -> Result<(), CloseError<()>> { panic!("lock poisoned") };
/// let failure = catch(&mut closer).unwrap_err();
/// assert_eq!(failure.class(), FailureClass::Fatal);
/// assert_eq!(failure.panic().and_then(|p| p.message()), Some("lock poisoned"));
/// ```
pub fn catch<C>(closer: &mut C) -> Result<(), Failure<C::Declared>>
where
    C: Closer + ?Sized,
{
    match panic::catch_unwind(AssertUnwindSafe(|| closer.close())) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.into()),
        Err(payload) => Err(Failure::Fatal(Panic::new(payload))),
    }
}

#[inline]
pub(crate) fn trace_intercept(decorator: &'static str, class: FailureClass) {
    #[cfg(feature = "tracing")]
    tracing::debug!(decorator, %class, "intercepted close failure");
    #[cfg(not(feature = "tracing"))]
    let _ = (decorator, class);
}
