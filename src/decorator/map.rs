//! Mapping decorators: turn intercepted failures into a single target kind.
//!
//! The mapper returns `Option<T>`. `Some(t)` raises `t` as the decorated
//! closer's only declared kind; `None` suppresses the failure entirely.
//! Suppression is legal but rarely what you want, since the release failure
//! then leaves no trace.

use std::fmt;

use crate::closer::{CloseError, Closer};
use crate::failure::{catch, trace_intercept, Failure, FailureClass};

fn raise_mapped<T>(mapped: Option<T>) -> Result<(), CloseError<T>> {
    match mapped {
        Some(t) => Err(CloseError::Declared(t)),
        None => Ok(()),
    }
}

/// Maps declared failures; undeclared errors and panics pass through.
///
/// Created by [`CloserExt::map_declared`](crate::CloserExt::map_declared)
/// and [`CloserExt::wrap_declared`](crate::CloserExt::wrap_declared).
pub struct MapDeclared<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for MapDeclared<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapDeclared")
            .field("inner", &"<closer>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<C, F> MapDeclared<C, F> {
    /// Wrap `inner`, mapping its declared failures with `f`.
    pub fn new(inner: C, f: F) -> Self {
        MapDeclared { inner, f }
    }
}

impl<C, F, T> Closer for MapDeclared<C, F>
where
    C: Closer,
    F: FnMut(C::Declared) -> Option<T>,
{
    type Declared = T;

    fn close(&mut self) -> Result<(), CloseError<T>> {
        match self.inner.close() {
            Ok(()) => Ok(()),
            Err(CloseError::Declared(d)) => {
                trace_intercept("map_declared", FailureClass::Declared);
                raise_mapped((self.f)(d))
            }
            Err(CloseError::Undeclared(e)) => Err(CloseError::Undeclared(e)),
        }
    }
}

/// Maps declared and undeclared failures; panics pass through.
///
/// Created by [`CloserExt::map_recoverable`](crate::CloserExt::map_recoverable)
/// and [`CloserExt::wrap_recoverable`](crate::CloserExt::wrap_recoverable).
pub struct MapRecoverable<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for MapRecoverable<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapRecoverable")
            .field("inner", &"<closer>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<C, F> MapRecoverable<C, F> {
    /// Wrap `inner`, mapping every recoverable failure with `f`.
    pub fn new(inner: C, f: F) -> Self {
        MapRecoverable { inner, f }
    }
}

impl<C, F, T> Closer for MapRecoverable<C, F>
where
    C: Closer,
    F: FnMut(CloseError<C::Declared>) -> Option<T>,
{
    type Declared = T;

    fn close(&mut self) -> Result<(), CloseError<T>> {
        match self.inner.close() {
            Ok(()) => Ok(()),
            Err(err) => {
                trace_intercept("map_recoverable", err.class());
                raise_mapped((self.f)(err))
            }
        }
    }
}

/// Maps every failure, panics included.
///
/// Created by [`CloserExt::map_fatal`](crate::CloserExt::map_fatal)
/// and [`CloserExt::wrap_fatal`](crate::CloserExt::wrap_fatal).
pub struct MapFatal<C, F> {
    pub(crate) inner: C,
    pub(crate) f: F,
}

impl<C, F> fmt::Debug for MapFatal<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapFatal")
            .field("inner", &"<closer>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<C, F> MapFatal<C, F> {
    /// Wrap `inner`, mapping every failure with `f`.
    pub fn new(inner: C, f: F) -> Self {
        MapFatal { inner, f }
    }
}

impl<C, F, T> Closer for MapFatal<C, F>
where
    C: Closer,
    F: FnMut(Failure<C::Declared>) -> Option<T>,
{
    type Declared = T;

    fn close(&mut self) -> Result<(), CloseError<T>> {
        match catch(&mut self.inner) {
            Ok(()) => Ok(()),
            Err(failure) => {
                trace_intercept("map_fatal", failure.class());
                raise_mapped((self.f)(failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catch_panic_message, ScriptedCloser, ScriptedError};
    use crate::{assert_closed, assert_declared, assert_undeclared};

    #[test]
    fn test_map_declared_raises_mapped_value() {
        let inner = ScriptedCloser::declared(4u8);
        let calls = inner.calls();
        let mut closer = MapDeclared::new(inner, |d: u8| Some(format!("code {}", d)));

        assert_eq!(assert_declared!(closer.close()), "code 4");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_map_declared_none_suppresses() {
        let mut closer = MapDeclared::new(ScriptedCloser::declared(4u8), |_: u8| None::<String>);
        assert_closed!(closer.close());
    }

    #[test]
    fn test_map_declared_leaves_undeclared_alone() {
        let mut mapped = 0;
        let mut closer = MapDeclared::new(ScriptedCloser::<u8>::undeclared("reset"), |d: u8| {
            mapped += 1;
            Some(d)
        });

        let err = assert_undeclared!(closer.close());
        assert_eq!(err.downcast_ref::<ScriptedError>().unwrap().0, "reset");
        drop(closer);
        assert_eq!(mapped, 0);
    }

    #[test]
    fn test_map_declared_lets_panic_unwind() {
        let mut closer = MapDeclared::new(ScriptedCloser::<u8>::panicking("boom"), Some::<u8>);
        assert_eq!(catch_panic_message(|| closer.close()).unwrap_err(), "boom");
    }

    #[test]
    fn test_map_recoverable_sees_undeclared() {
        let mut closer = MapRecoverable::new(ScriptedCloser::<u8>::undeclared("reset"), |e: CloseError<u8>| {
            Some(e.to_string())
        });
        assert_eq!(assert_declared!(closer.close()), "reset");
    }

    #[test]
    fn test_map_recoverable_lets_panic_unwind() {
        let mut closer =
            MapRecoverable::new(ScriptedCloser::<u8>::panicking("boom"), |e: CloseError<u8>| {
                Some(e.class())
            });
        assert!(catch_panic_message(|| closer.close()).is_err());
    }

    #[test]
    fn test_map_fatal_sees_panic() {
        let inner = ScriptedCloser::<u8>::panicking("boom");
        let calls = inner.calls();
        let mut closer = MapFatal::new(inner, |f: Failure<u8>| Some(f.to_string()));

        assert_eq!(assert_declared!(closer.close()), "panicked: boom");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_success_never_calls_mapper() {
        let mut mapped = 0;
        let mut closer = MapFatal::new(ScriptedCloser::<u8>::succeeding(), |_: Failure<u8>| {
            mapped += 1;
            Some(())
        });
        assert_closed!(closer.close());
        drop(closer);
        assert_eq!(mapped, 0);
    }
}
