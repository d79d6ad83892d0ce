//! # Closer
//!
//! Composable failure policies for releasing resources.
//!
//! A [`Closer`] is a release operation that may fail with a statically
//! declared set of error kinds. Decorators from [`CloserExt`] change what
//! happens to those failures without touching the release itself:
//!
//! - **map**: turn failures into one target kind (`map_*`, `wrap_*`)
//! - **consume**: hand failures to an observer and report success
//!   (`consume_*`, `ignore_*`)
//! - **rethrow**: observe failures, then re-raise all or some of them
//!   (`rethrow`, `rethrow_when`)
//!
//! Failures fall into three classes: declared kinds, undeclared recoverable
//! errors, and panics. Each decorator intercepts a fixed prefix of that
//! order (see [`Breadth`]) and lets everything else through unchanged.
//! Decorated closers call the wrapped release exactly once per `close`.
//!
//! ## Quick Example
//!
//! ```rust
//! use closer::{CloseError, Closer, CloserExt, Declared2, OneOf2};
//!
//! #[derive(Debug)]
//! enum Timeout { Flush }
//! #[derive(Debug)]
//! enum Refused { Peer }
//!
//! let mut release = || -> Result<(), CloseError<Declared2<Timeout, Refused>>> {
//!     Err(OneOf2::First(Timeout::Flush).into())
//! };
//!
//! // Map both declared kinds to a single message, keep everything else.
//! let mut closer = (&mut release).map_declared(|kind| Some(format!("{:?}", kind)));
//! assert_eq!(closer.close().unwrap_err().into_declared(), Some("First(Flush)".to_string()));
//!
//! // Or drop declared failures on the floor.
//! let mut quiet = release.ignore_declared();
//! assert!(quiet.close().is_ok());
//! ```
//!
//! ## Scoped use
//!
//! [`using`] and [`CloseGuard`] close a resource exactly once when a scope
//! ends, even if the scope panics.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod arity;
mod boxed;
mod closer;
pub mod decorator;
mod ext;
mod failure;
mod not_closed;
mod scope;
pub mod testing;

// Re-exports
pub use arity::{Declared0, Declared1, Declared2, Declared3, Declared4, Declared5};
pub use arity::{OneOf2, OneOf3, OneOf4, OneOf5};
pub use boxed::{BoxedCloser, BoxedLocalCloser};
pub use closer::{from_fn, infallible, BoxError, CloseError, Closer, FromFn, InfallibleFn};
pub use ext::{
    CloserExt, IgnoreDeclared, IgnoreFatal, IgnoreRecoverable, WrapDeclared, WrapFatal,
    WrapRecoverable,
};
pub use failure::{catch, Breadth, Failure, FailureClass, Panic};
pub use not_closed::NotClosed;
pub use scope::{using, CloseGuard, ScopeError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::closer::{from_fn, infallible, CloseError, Closer};
    pub use crate::ext::CloserExt;
    pub use crate::failure::{Failure, FailureClass};
    pub use crate::not_closed::NotClosed;
    pub use crate::scope::{using, CloseGuard};
}
