//! The sentinel produced by the default wrapping decorators.

use std::error::Error as StdError;
use std::fmt;

/// Marks a failure that happened while releasing a resource.
///
/// Only the `wrap_*` decorators on [`CloserExt`](crate::CloserExt) construct
/// this type, so seeing one means the failure came out of a decorated
/// release. The original failure is kept as the cause.
///
/// # Examples
///
/// ```rust
/// use closer::{CloseError, Closer, CloserExt};
///
/// #[derive(Debug, PartialEq)]
/// struct Busy;
///
/// let mut closer = (|| -> Result<(), CloseError<Busy>> { Err(Busy.into()) }).wrap_declared();
///
/// match closer.close() {
///     Err(CloseError::Declared(not_closed)) => assert_eq!(not_closed.cause(), &Busy),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Debug)]
pub struct NotClosed<C> {
    cause: C,
}

impl<C> NotClosed<C> {
    pub(crate) fn new(cause: C) -> Self {
        NotClosed { cause }
    }

    /// Borrow the original failure.
    pub fn cause(&self) -> &C {
        &self.cause
    }

    /// Take the original failure.
    pub fn into_cause(self) -> C {
        self.cause
    }
}

/// Default mapper used by the `wrap_*` decorators.
pub(crate) fn wrap<C>(cause: C) -> Option<NotClosed<C>> {
    Some(NotClosed::new(cause))
}

impl<C: fmt::Display> fmt::Display for NotClosed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource was not closed: {}", self.cause)
    }
}

impl<C: StdError + 'static> StdError for NotClosed<C> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_includes_cause() {
        let err = NotClosed::new(io::Error::other("fsync failed"));
        assert_eq!(err.to_string(), "resource was not closed: fsync failed");
    }

    #[test]
    fn test_source_is_cause() {
        let err = NotClosed::new(io::Error::other("fsync failed"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "fsync failed");
        assert!(source.downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn test_into_cause() {
        assert_eq!(wrap(5u8).map(NotClosed::into_cause), Some(5));
    }
}
