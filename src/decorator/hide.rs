//! Hide decorator: drop the declared kind from the static type.

use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

use crate::closer::{CloseError, Closer};

/// Re-raises declared failures as undeclared errors carrying the same value.
///
/// The resulting closer declares nothing, yet the original error is still
/// raised and can be recovered with `downcast_ref`. Prefer a `wrap_*`
/// decorator when callers should be able to match on the failure.
///
/// Created by [`CloserExt::hide`](crate::CloserExt::hide).
///
/// ```rust
/// use closer::{from_fn, Closer, CloserExt};
/// use std::io;
///
/// let mut closer = from_fn(|| Err::<(), _>(io::Error::other("flush"))).hide();
/// let err = closer.close().unwrap_err().into_undeclared();
/// assert_eq!(err.downcast_ref::<io::Error>().unwrap().to_string(), "flush");
/// ```
pub struct Hide<C> {
    pub(crate) inner: C,
}

impl<C> fmt::Debug for Hide<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hide").field("inner", &"<closer>").finish()
    }
}

impl<C> Hide<C> {
    /// Wrap `inner`.
    pub fn new(inner: C) -> Self {
        Hide { inner }
    }
}

impl<C> Closer for Hide<C>
where
    C: Closer,
    C::Declared: StdError + Send + Sync + 'static,
{
    type Declared = Infallible;

    fn close(&mut self) -> Result<(), CloseError<Infallible>> {
        self.inner.close().map_err(|err| match err {
            CloseError::Declared(d) => CloseError::Undeclared(Box::new(d)),
            CloseError::Undeclared(e) => CloseError::Undeclared(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_undeclared;
    use crate::testing::{ScriptedCloser, ScriptedError};

    #[test]
    fn test_declared_value_survives_hiding() {
        let inner = ScriptedCloser::declared(ScriptedError("quota".to_string()));
        let calls = inner.calls();
        let mut closer = Hide::new(inner);

        let err = assert_undeclared!(closer.close());
        assert_eq!(err.downcast_ref::<ScriptedError>(), Some(&ScriptedError("quota".to_string())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_undeclared_passes_through() {
        let mut closer = Hide::new(ScriptedCloser::<ScriptedError>::undeclared("reset"));
        let err = assert_undeclared!(closer.close());
        assert_eq!(err.to_string(), "reset");
    }
}
