//! Rethrow decorators: observe every failure, then raise it again or not.
//!
//! Both see all three classes. A re-raised failure is the original value:
//! recoverable errors come back as `Err`, a panic resumes with its original
//! payload.

use std::fmt;

use crate::closer::{CloseError, Closer};
use crate::failure::{catch, trace_intercept, Failure};

/// Calls an observer on any failure, then re-raises it unchanged.
///
/// Created by [`CloserExt::rethrow`](crate::CloserExt::rethrow).
pub struct Rethrow<C, F> {
    pub(crate) inner: C,
    pub(crate) observer: F,
}

impl<C, F> fmt::Debug for Rethrow<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rethrow")
            .field("inner", &"<closer>")
            .field("observer", &"<observer>")
            .finish()
    }
}

impl<C, F> Rethrow<C, F> {
    /// Wrap `inner`, showing each failure to `observer` before re-raising.
    pub fn new(inner: C, observer: F) -> Self {
        Rethrow { inner, observer }
    }
}

impl<C, F> Closer for Rethrow<C, F>
where
    C: Closer,
    F: FnMut(&Failure<C::Declared>),
{
    type Declared = C::Declared;

    fn close(&mut self) -> Result<(), CloseError<C::Declared>> {
        match catch(&mut self.inner) {
            Ok(()) => Ok(()),
            Err(failure) => {
                trace_intercept("rethrow", failure.class());
                (self.observer)(&failure);
                failure.raise()
            }
        }
    }
}

/// Re-raises a failure only when the predicate says so.
///
/// The predicate may have side effects; it runs once per failure.
///
/// Created by [`CloserExt::rethrow_when`](crate::CloserExt::rethrow_when).
pub struct RethrowWhen<C, P> {
    pub(crate) inner: C,
    pub(crate) predicate: P,
}

impl<C, P> fmt::Debug for RethrowWhen<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RethrowWhen")
            .field("inner", &"<closer>")
            .field("predicate", &"<predicate>")
            .finish()
    }
}

impl<C, P> RethrowWhen<C, P> {
    /// Wrap `inner`, re-raising a failure iff `predicate` returns `true`.
    pub fn new(inner: C, predicate: P) -> Self {
        RethrowWhen { inner, predicate }
    }
}

impl<C, P> Closer for RethrowWhen<C, P>
where
    C: Closer,
    P: FnMut(&Failure<C::Declared>) -> bool,
{
    type Declared = C::Declared;

    fn close(&mut self) -> Result<(), CloseError<C::Declared>> {
        match catch(&mut self.inner) {
            Ok(()) => Ok(()),
            Err(failure) => {
                trace_intercept("rethrow_when", failure.class());
                if (self.predicate)(&failure) {
                    failure.raise()
                } else {
                    Ok(())
                }
            }
        }
    }
}
