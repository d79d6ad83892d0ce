//! Type-erased closers.
//!
//! Decorator chains produce deeply nested types. Box them when you need to
//! store closers with different chains side by side, return different
//! chains from match arms, or keep a struct field simple.

use std::fmt;

use crate::closer::{CloseError, Closer};

/// A boxed, `Send` closer declaring `D`.
///
/// # Example
///
/// ```rust
/// use closer::{from_fn, infallible, BoxedCloser, Closer, CloserExt};
///
/// let mut closers: Vec<BoxedCloser<std::convert::Infallible>> = vec![
///     infallible(|| ()).boxed(),
///     from_fn(|| Err::<(), _>("stale lock")).ignore_declared().boxed(),
/// ];
///
/// for closer in closers.iter_mut() {
///     assert!(closer.close().is_ok());
/// }
/// ```
pub struct BoxedCloser<D> {
    inner: Box<dyn Closer<Declared = D> + Send>,
}

impl<D> BoxedCloser<D> {
    /// Box a closer.
    pub fn new<C>(closer: C) -> Self
    where
        C: Closer<Declared = D> + Send + 'static,
    {
        BoxedCloser {
            inner: Box::new(closer),
        }
    }
}

impl<D> Closer for BoxedCloser<D> {
    type Declared = D;

    fn close(&mut self) -> Result<(), CloseError<D>> {
        self.inner.close()
    }
}

impl<D> fmt::Debug for BoxedCloser<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedCloser")
            .field("inner", &"<closer>")
            .finish()
    }
}

/// A boxed closer declaring `D` that may hold non-`Send` state.
pub struct BoxedLocalCloser<D> {
    inner: Box<dyn Closer<Declared = D>>,
}

impl<D> BoxedLocalCloser<D> {
    /// Box a closer.
    pub fn new<C>(closer: C) -> Self
    where
        C: Closer<Declared = D> + 'static,
    {
        BoxedLocalCloser {
            inner: Box::new(closer),
        }
    }
}

impl<D> Closer for BoxedLocalCloser<D> {
    type Declared = D;

    fn close(&mut self) -> Result<(), CloseError<D>> {
        self.inner.close()
    }
}

impl<D> fmt::Debug for BoxedLocalCloser<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedLocalCloser")
            .field("inner", &"<closer>")
            .finish()
    }
}
