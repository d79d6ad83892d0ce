//! Consuming decorators: hand intercepted failures to an observer and
//! report success.
//!
//! The observer runs outside any panic interception. If it panics, that
//! panic replaces the failure it was handed.

use std::convert::Infallible;
use std::fmt;

use crate::closer::{CloseError, Closer};
use crate::failure::{catch, trace_intercept, Failure, FailureClass};

/// Consumes declared failures; undeclared errors and panics pass through.
///
/// Created by [`CloserExt::consume_declared`](crate::CloserExt::consume_declared)
/// and [`CloserExt::ignore_declared`](crate::CloserExt::ignore_declared).
pub struct ConsumeDeclared<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for ConsumeDeclared<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumeDeclared")
            .field("inner", &"<closer>")
            .field("f", &"<observer>")
            .finish()
    }
}

impl<C, F> ConsumeDeclared<C, F> {
    /// Wrap `inner`, handing its declared failures to `f`.
    pub fn new(inner: C, f: F) -> Self {
        ConsumeDeclared { inner, f }
    }
}

impl<C, F> Closer for ConsumeDeclared<C, F>
where
    C: Closer,
    F: FnMut(C::Declared),
{
    type Declared = Infallible;

    fn close(&mut self) -> Result<(), CloseError<Infallible>> {
        match self.inner.close() {
            Ok(()) => Ok(()),
            Err(CloseError::Declared(d)) => {
                trace_intercept("consume_declared", FailureClass::Declared);
                (self.f)(d);
                Ok(())
            }
            Err(CloseError::Undeclared(e)) => Err(CloseError::Undeclared(e)),
        }
    }
}

/// Consumes declared and undeclared failures; panics pass through.
///
/// Created by [`CloserExt::consume_recoverable`](crate::CloserExt::consume_recoverable)
/// and [`CloserExt::ignore_recoverable`](crate::CloserExt::ignore_recoverable).
pub struct ConsumeRecoverable<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for ConsumeRecoverable<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumeRecoverable")
            .field("inner", &"<closer>")
            .field("f", &"<observer>")
            .finish()
    }
}

impl<C, F> ConsumeRecoverable<C, F> {
    /// Wrap `inner`, handing every recoverable failure to `f`.
    pub fn new(inner: C, f: F) -> Self {
        ConsumeRecoverable { inner, f }
    }
}

impl<C, F> Closer for ConsumeRecoverable<C, F>
where
    C: Closer,
    F: FnMut(CloseError<C::Declared>),
{
    type Declared = Infallible;

    fn close(&mut self) -> Result<(), CloseError<Infallible>> {
        if let Err(err) = self.inner.close() {
            trace_intercept("consume_recoverable", err.class());
            (self.f)(err);
        }
        Ok(())
    }
}

/// Consumes every failure, panics included.
///
/// Created by [`CloserExt::consume_fatal`](crate::CloserExt::consume_fatal)
/// and [`CloserExt::ignore_fatal`](crate::CloserExt::ignore_fatal).
pub struct ConsumeFatal<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for ConsumeFatal<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumeFatal")
            .field("inner", &"<closer>")
            .field("f", &"<observer>")
            .finish()
    }
}

impl<C, F> ConsumeFatal<C, F> {
    /// Wrap `inner`, handing every failure to `f`.
    pub fn new(inner: C, f: F) -> Self {
        ConsumeFatal { inner, f }
    }
}

impl<C, F> Closer for ConsumeFatal<C, F>
where
    C: Closer,
    F: FnMut(Failure<C::Declared>),
{
    type Declared = Infallible;

    fn close(&mut self) -> Result<(), CloseError<Infallible>> {
        if let Err(failure) = catch(&mut self.inner) {
            trace_intercept("consume_fatal", failure.class());
            (self.f)(failure);
        }
        Ok(())
    }
}

/// No-op observer behind the `ignore_*` decorators.
pub(crate) fn discard<T>(_: T) {}
