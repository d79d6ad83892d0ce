//! Scoped use of a closer: run a body, then always close.
//!
//! [`using`] is the function form, [`CloseGuard`] the RAII form. Both close
//! exactly once, including when the body panics. A close failure that cannot
//! be returned to the caller is logged: through `tracing` when the feature is
//! enabled, to stderr otherwise.

use std::error::Error as StdError;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

use crate::closer::{CloseError, Closer};
use crate::failure::{catch, Failure};

/// Failure of a scoped body or of the close that followed it.
#[derive(Debug)]
pub enum ScopeError<E, D> {
    /// The body failed. Any close failure after it was logged.
    Body(E),
    /// The body succeeded but closing failed.
    Close(CloseError<D>),
}

impl<E, D> ScopeError<E, D> {
    /// Returns `true` if the body failed.
    pub fn is_body(&self) -> bool {
        matches!(self, ScopeError::Body(_))
    }

    /// Returns `true` if closing failed.
    pub fn is_close(&self) -> bool {
        matches!(self, ScopeError::Close(_))
    }

    /// Take the body error, if any.
    pub fn into_body(self) -> Option<E> {
        match self {
            ScopeError::Body(e) => Some(e),
            ScopeError::Close(_) => None,
        }
    }

    /// Take the close error, if any.
    pub fn into_close(self) -> Option<CloseError<D>> {
        match self {
            ScopeError::Body(_) => None,
            ScopeError::Close(e) => Some(e),
        }
    }
}

impl<E: fmt::Display, D: fmt::Display> fmt::Display for ScopeError<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::Body(e) => e.fmt(f),
            ScopeError::Close(e) => write!(f, "close failed: {}", e),
        }
    }
}

impl<E, D> StdError for ScopeError<E, D>
where
    E: StdError + 'static,
    D: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ScopeError::Body(e) => Some(e),
            ScopeError::Close(e) => Some(e),
        }
    }
}

fn report<D: fmt::Debug>(failure: &Failure<D>) {
    #[cfg(feature = "tracing")]
    tracing::warn!(class = %failure.class(), "Resource close failed: {:?}", failure);
    #[cfg(not(feature = "tracing"))]
    eprintln!("Resource close failed: {:?}", failure);
}

fn report_after_panic<D: fmt::Debug>(failure: &Failure<D>) {
    #[cfg(feature = "tracing")]
    tracing::error!(class = %failure.class(), "Resource close failed after panic: {:?}", failure);
    #[cfg(not(feature = "tracing"))]
    eprintln!("Resource close failed after panic: {:?}", failure);
}

/// Run `body` with the closer, then close it exactly once.
///
/// - Body `Ok`, close `Ok`: returns the body's value.
/// - Body `Ok`, close fails: returns [`ScopeError::Close`].
/// - Body `Err`: returns [`ScopeError::Body`]; a close failure is logged.
/// - Body panics: the closer is still closed, any close failure (a panic
///   included) is logged, then the body's panic resumes.
///
/// A panic raised by the close itself after a successful body propagates.
///
/// # Example
///
/// ```rust
/// use closer::{using, CloseError, Closer, ScopeError};
///
/// struct Conn {
///     open: bool,
/// }
///
/// impl Closer for Conn {
///     type Declared = String;
///
///     fn close(&mut self) -> Result<(), CloseError<String>> {
///         self.open = false;
///         Err(CloseError::Declared("goodbye not acknowledged".into()))
///     }
/// }
///
/// let result = using(Conn { open: true }, |conn| Ok::<_, String>(conn.open));
/// match result {
///     Err(ScopeError::Close(e)) => assert_eq!(e.to_string(), "goodbye not acknowledged"),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub fn using<C, T, E, F>(mut closer: C, body: F) -> Result<T, ScopeError<E, C::Declared>>
where
    C: Closer,
    C::Declared: fmt::Debug,
    F: FnOnce(&mut C) -> Result<T, E>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(&mut closer)));

    match outcome {
        Ok(Ok(value)) => closer.close().map(|()| value).map_err(ScopeError::Close),
        Ok(Err(body_err)) => {
            if let Err(close_err) = closer.close() {
                report(&Failure::from(close_err));
            }
            Err(ScopeError::Body(body_err))
        }
        Err(payload) => {
            if let Err(failure) = catch(&mut closer) {
                report_after_panic(&failure);
            }
            panic::resume_unwind(payload)
        }
    }
}

/// Closes the wrapped closer when dropped.
///
/// Dropping never panics: any failure of the close, a panic included, is
/// logged. Call [`CloseGuard::close`] to observe the result instead.
///
/// # Example
///
/// ```rust
/// use closer::{infallible, CloseGuard};
/// use std::cell::Cell;
///
/// let released = Cell::new(false);
/// {
///     let _guard = CloseGuard::new(infallible(|| released.set(true)));
/// }
/// assert!(released.get());
/// ```
pub struct CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    closer: C,
    closed: bool,
}

impl<C> CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    /// Guard `closer`.
    pub fn new(closer: C) -> Self {
        CloseGuard {
            closer,
            closed: false,
        }
    }

    /// Close now and return the result. The drop that follows does nothing.
    pub fn close(mut self) -> Result<(), CloseError<C::Declared>> {
        self.closed = true;
        self.closer.close()
    }
}

impl<C> Deref for CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    type Target = C;

    fn deref(&self) -> &C {
        &self.closer
    }
}

impl<C> DerefMut for CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    fn deref_mut(&mut self) -> &mut C {
        &mut self.closer
    }
}

impl<C> Drop for CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(failure) = catch(&mut self.closer) {
            if std::thread::panicking() {
                report_after_panic(&failure);
            } else {
                report(&failure);
            }
        }
    }
}

impl<C> fmt::Debug for CloseGuard<C>
where
    C: Closer,
    C::Declared: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloseGuard")
            .field("closer", &"<closer>")
            .field("closed", &self.closed)
            .finish()
    }
}
