//! The `Closer` trait and the error a release step returns.
//!
//! A closer is a zero-argument release operation. It either succeeds or
//! fails with a [`CloseError`], which separates the kinds the closer
//! *declares* (its `Declared` type) from any other recoverable error.
//! Panics raised while closing are the third, fatal class; they are never
//! part of the return type and keep unwinding unless a fatal-breadth
//! decorator intercepts them.
//!
//! # Examples
//!
//! ```rust
//! use closer::{CloseError, Closer};
//!
//! #[derive(Debug, PartialEq)]
//! struct FlushFailed;
//!
//! let mut flushed = false;
//! let mut release = || -> Result<(), CloseError<FlushFailed>> {
//!     flushed = true;
//!     Err(CloseError::Declared(FlushFailed))
//! };
//!
//! assert!(matches!(release.close(), Err(CloseError::Declared(FlushFailed))));
//! ```

use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

use crate::failure::FailureClass;

/// Boxed error carried by the undeclared-recoverable class.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A resource release operation with a statically declared failure kind.
///
/// `Declared` is the sum of the error kinds this closer advertises. Use
/// [`Infallible`] when it declares none, the error type itself for a single
/// kind, and [`OneOf2`](crate::OneOf2) through [`OneOf5`](crate::OneOf5)
/// for two to five kinds.
///
/// Every closure `FnMut() -> Result<(), CloseError<D>>` is a `Closer`.
pub trait Closer {
    /// The declared failure kinds, as a single sum type.
    type Declared;

    /// Release the resource now.
    ///
    /// Each call performs the release action once. Calling it again is
    /// only as safe as the underlying resource makes it.
    fn close(&mut self) -> Result<(), CloseError<Self::Declared>>;
}

impl<F, D> Closer for F
where
    F: FnMut() -> Result<(), CloseError<D>>,
{
    type Declared = D;

    #[inline]
    fn close(&mut self) -> Result<(), CloseError<D>> {
        self()
    }
}

/// Failure returned by [`Closer::close`].
#[derive(Debug)]
pub enum CloseError<D> {
    /// One of the closer's declared kinds.
    Declared(D),
    /// Any other recoverable error.
    Undeclared(BoxError),
}

impl<D> CloseError<D> {
    /// Wrap an error outside the declared set.
    ///
    /// ```rust
    /// use closer::CloseError;
    ///
    /// let err: CloseError<std::convert::Infallible> = CloseError::undeclared("socket reset");
    /// assert!(err.is_undeclared());
    /// assert_eq!(err.to_string(), "socket reset");
    /// ```
    pub fn undeclared(error: impl Into<BoxError>) -> Self {
        CloseError::Undeclared(error.into())
    }

    /// Which failure class this error belongs to.
    pub fn class(&self) -> FailureClass {
        match self {
            CloseError::Declared(_) => FailureClass::Declared,
            CloseError::Undeclared(_) => FailureClass::Undeclared,
        }
    }

    /// Returns `true` for a declared kind.
    pub fn is_declared(&self) -> bool {
        matches!(self, CloseError::Declared(_))
    }

    /// Returns `true` for an undeclared error.
    pub fn is_undeclared(&self) -> bool {
        matches!(self, CloseError::Undeclared(_))
    }

    /// Borrow the declared value, if any.
    pub fn declared(&self) -> Option<&D> {
        match self {
            CloseError::Declared(d) => Some(d),
            CloseError::Undeclared(_) => None,
        }
    }

    /// Take the declared value, if any.
    pub fn into_declared(self) -> Option<D> {
        match self {
            CloseError::Declared(d) => Some(d),
            CloseError::Undeclared(_) => None,
        }
    }

    /// Downcast an undeclared error to a concrete type.
    pub fn downcast_undeclared_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match self {
            CloseError::Declared(_) => None,
            CloseError::Undeclared(e) => e.downcast_ref::<T>(),
        }
    }

    /// Transform the declared value, leaving undeclared errors untouched.
    pub fn map_declared<T>(self, f: impl FnOnce(D) -> T) -> CloseError<T> {
        match self {
            CloseError::Declared(d) => CloseError::Declared(f(d)),
            CloseError::Undeclared(e) => CloseError::Undeclared(e),
        }
    }
}

impl CloseError<Infallible> {
    /// A closer that declares nothing can only fail undeclared.
    pub fn into_undeclared(self) -> BoxError {
        match self {
            CloseError::Declared(never) => match never {},
            CloseError::Undeclared(e) => e,
        }
    }
}

impl<D> From<D> for CloseError<D> {
    fn from(declared: D) -> Self {
        CloseError::Declared(declared)
    }
}

impl<D: fmt::Display> fmt::Display for CloseError<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseError::Declared(d) => d.fmt(f),
            CloseError::Undeclared(e) => e.fmt(f),
        }
    }
}

impl<D: StdError + 'static> StdError for CloseError<D> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CloseError::Declared(d) => d.source(),
            CloseError::Undeclared(e) => e.source(),
        }
    }
}

/// Closer built from a function returning a plain `Result`.
///
/// Created by [`from_fn`]. Every error the function returns is declared.
pub struct FromFn<F> {
    f: F,
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FromFn").field("f", &"<function>").finish()
    }
}

impl<F, E> Closer for FromFn<F>
where
    F: FnMut() -> Result<(), E>,
{
    type Declared = E;

    fn close(&mut self) -> Result<(), CloseError<E>> {
        (self.f)().map_err(CloseError::Declared)
    }
}

/// Lift a release function returning `Result<(), E>` into a closer that
/// declares `E`.
///
/// ```rust
/// use closer::{from_fn, CloseError, Closer};
/// use std::io;
///
/// let mut closer = from_fn(|| Err::<(), _>(io::Error::other("disk gone")));
/// assert!(matches!(closer.close(), Err(CloseError::Declared(_))));
/// ```
pub fn from_fn<F, E>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<(), E>,
{
    FromFn { f }
}

/// Closer built from a release function that cannot fail.
///
/// Created by [`infallible`].
pub struct InfallibleFn<F> {
    f: F,
}

impl<F> fmt::Debug for InfallibleFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfallibleFn").field("f", &"<function>").finish()
    }
}

impl<F> Closer for InfallibleFn<F>
where
    F: FnMut(),
{
    type Declared = Infallible;

    fn close(&mut self) -> Result<(), CloseError<Infallible>> {
        (self.f)();
        Ok(())
    }
}

/// Lift a release function with no failure channel into a closer with no
/// declared kinds. It can still panic.
pub fn infallible<F>(f: F) -> InfallibleFn<F>
where
    F: FnMut(),
{
    InfallibleFn { f }
}
