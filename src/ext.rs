//! Extension trait providing decorator methods for all closers.
//!
//! The `CloserExt` trait is automatically implemented for every type that
//! implements `Closer`. Each method wraps `self` in one decorator from
//! [`crate::decorator`] and returns it, so chains read outermost-last:
//!
//! ```rust
//! use closer::{CloseError, Closer, CloserExt, FailureClass};
//!
//! #[derive(Debug)]
//! struct Busy;
//!
//! let mut seen = Vec::new();
//! let mut closer = (|| -> Result<(), CloseError<Busy>> { Err(Busy.into()) })
//!     .wrap_declared()
//!     .rethrow(|failure| seen.push(failure.class()));
//!
//! assert!(closer.close().is_err());
//! drop(closer);
//! assert_eq!(seen, vec![FailureClass::Declared]);
//! ```

use std::error::Error as StdError;

use crate::boxed::{BoxedCloser, BoxedLocalCloser};
use crate::closer::{CloseError, Closer};
use crate::decorator::{
    discard, ConsumeDeclared, ConsumeFatal, ConsumeRecoverable, Hide, MapDeclared, MapFatal,
    MapRecoverable, Rethrow, RethrowWhen,
};
use crate::failure::Failure;
use crate::not_closed::{wrap, NotClosed};

/// Returned by [`CloserExt::wrap_declared`].
pub type WrapDeclared<C> = MapDeclared<
    C,
    fn(<C as Closer>::Declared) -> Option<NotClosed<<C as Closer>::Declared>>,
>;

/// Returned by [`CloserExt::wrap_recoverable`].
pub type WrapRecoverable<C> = MapRecoverable<
    C,
    fn(CloseError<<C as Closer>::Declared>) -> Option<NotClosed<CloseError<<C as Closer>::Declared>>>,
>;

/// Returned by [`CloserExt::wrap_fatal`].
pub type WrapFatal<C> = MapFatal<
    C,
    fn(Failure<<C as Closer>::Declared>) -> Option<NotClosed<Failure<<C as Closer>::Declared>>>,
>;

/// Returned by [`CloserExt::ignore_declared`].
pub type IgnoreDeclared<C> = ConsumeDeclared<C, fn(<C as Closer>::Declared)>;

/// Returned by [`CloserExt::ignore_recoverable`].
pub type IgnoreRecoverable<C> = ConsumeRecoverable<C, fn(CloseError<<C as Closer>::Declared>)>;

/// Returned by [`CloserExt::ignore_fatal`].
pub type IgnoreFatal<C> = ConsumeFatal<C, fn(Failure<<C as Closer>::Declared>)>;

/// Extension trait providing decorator methods for all closers.
///
/// You don't need to implement this trait yourself.
pub trait CloserExt: Closer + Sized {
    /// Map declared failures through `f`.
    ///
    /// `Some(t)` raises `t` as the only declared kind of the result;
    /// `None` suppresses the failure. Undeclared errors and panics pass
    /// through unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use closer::{from_fn, CloseError, Closer, CloserExt};
    ///
    /// let mut closer = from_fn(|| Err::<(), _>(404u16)).map_declared(|code| Some(code.to_string()));
    /// assert_eq!(closer.close().unwrap_err().into_declared(), Some("404".to_string()));
    /// ```
    fn map_declared<T, F>(self, f: F) -> MapDeclared<Self, F>
    where
        F: FnMut(Self::Declared) -> Option<T>,
    {
        MapDeclared::new(self, f)
    }

    /// Map declared and undeclared failures through `f`. Panics pass
    /// through unchanged.
    fn map_recoverable<T, F>(self, f: F) -> MapRecoverable<Self, F>
    where
        F: FnMut(CloseError<Self::Declared>) -> Option<T>,
    {
        MapRecoverable::new(self, f)
    }

    /// Map every failure through `f`, panics included.
    fn map_fatal<T, F>(self, f: F) -> MapFatal<Self, F>
    where
        F: FnMut(Failure<Self::Declared>) -> Option<T>,
    {
        MapFatal::new(self, f)
    }

    /// Wrap declared failures in [`NotClosed`].
    fn wrap_declared(self) -> WrapDeclared<Self> {
        MapDeclared::new(
            self,
            wrap as fn(Self::Declared) -> Option<NotClosed<Self::Declared>>,
        )
    }

    /// Wrap declared and undeclared failures in [`NotClosed`].
    fn wrap_recoverable(self) -> WrapRecoverable<Self> {
        MapRecoverable::new(
            self,
            wrap as fn(CloseError<Self::Declared>) -> Option<NotClosed<CloseError<Self::Declared>>>,
        )
    }

    /// Wrap every failure in [`NotClosed`], panics included.
    ///
    /// ```rust
    /// use closer::{infallible, Closer, CloserExt, FailureClass};
    ///
    /// let mut closer = infallible(|| panic!("handle leaked")).wrap_fatal();
    /// let not_closed = closer.close().unwrap_err().into_declared().unwrap();
    /// assert_eq!(not_closed.cause().class(), FailureClass::Fatal);
    /// ```
    fn wrap_fatal(self) -> WrapFatal<Self> {
        MapFatal::new(
            self,
            wrap as fn(Failure<Self::Declared>) -> Option<NotClosed<Failure<Self::Declared>>>,
        )
    }

    /// Move declared failures into the undeclared slot, same value.
    fn hide(self) -> Hide<Self>
    where
        Self::Declared: StdError + Send + Sync + 'static,
    {
        Hide::new(self)
    }

    /// Hand declared failures to `f` instead of raising them.
    fn consume_declared<F>(self, f: F) -> ConsumeDeclared<Self, F>
    where
        F: FnMut(Self::Declared),
    {
        ConsumeDeclared::new(self, f)
    }

    /// Hand declared and undeclared failures to `f` instead of raising them.
    fn consume_recoverable<F>(self, f: F) -> ConsumeRecoverable<Self, F>
    where
        F: FnMut(CloseError<Self::Declared>),
    {
        ConsumeRecoverable::new(self, f)
    }

    /// Hand every failure to `f` instead of raising it, panics included.
    fn consume_fatal<F>(self, f: F) -> ConsumeFatal<Self, F>
    where
        F: FnMut(Failure<Self::Declared>),
    {
        ConsumeFatal::new(self, f)
    }

    /// Silently drop declared failures.
    fn ignore_declared(self) -> IgnoreDeclared<Self> {
        ConsumeDeclared::new(self, discard as fn(Self::Declared))
    }

    /// Silently drop declared and undeclared failures.
    fn ignore_recoverable(self) -> IgnoreRecoverable<Self> {
        ConsumeRecoverable::new(self, discard as fn(CloseError<Self::Declared>))
    }

    /// Silently drop every failure, panics included.
    fn ignore_fatal(self) -> IgnoreFatal<Self> {
        ConsumeFatal::new(self, discard as fn(Failure<Self::Declared>))
    }

    /// Show any failure to `observer`, then raise it unchanged.
    fn rethrow<F>(self, observer: F) -> Rethrow<Self, F>
    where
        F: FnMut(&Failure<Self::Declared>),
    {
        Rethrow::new(self, observer)
    }

    /// Raise a failure only when `predicate` returns `true`.
    ///
    /// ```rust
    /// use closer::{infallible, Closer, CloserExt};
    ///
    /// let mut recorded = false;
    /// let mut closer = infallible(|| assert!(false, "assertion")).rethrow_when(|_| {
    ///     recorded = true;
    ///     false
    /// });
    ///
    /// assert!(closer.close().is_ok());
    /// drop(closer);
    /// assert!(recorded);
    /// ```
    fn rethrow_when<P>(self, predicate: P) -> RethrowWhen<Self, P>
    where
        P: FnMut(&Failure<Self::Declared>) -> bool,
    {
        RethrowWhen::new(self, predicate)
    }

    /// Erase the closer's type.
    fn boxed(self) -> BoxedCloser<Self::Declared>
    where
        Self: Send + 'static,
    {
        BoxedCloser::new(self)
    }

    /// Erase the closer's type without requiring `Send`.
    fn boxed_local(self) -> BoxedLocalCloser<Self::Declared>
    where
        Self: 'static,
    {
        BoxedLocalCloser::new(self)
    }
}

impl<C: Closer> CloserExt for C {}
