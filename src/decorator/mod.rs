//! Decorator types that change how a closer's failures propagate.
//!
//! Each decorator wraps exactly one closer plus one policy function and is
//! itself a [`Closer`](crate::Closer), so decorators nest freely. Every
//! decorated `close` calls the wrapped `close` exactly once.
//!
//! Most users won't name these types directly. Use the methods on
//! [`CloserExt`](crate::CloserExt), which return them.
//!
//! | family | declared | undeclared | fatal |
//! |--------|----------|------------|-------|
//! | [`MapDeclared`], [`ConsumeDeclared`] | intercepted | passes | passes |
//! | [`MapRecoverable`], [`ConsumeRecoverable`] | intercepted | intercepted | passes |
//! | [`MapFatal`], [`ConsumeFatal`] | intercepted | intercepted | intercepted |
//! | [`Rethrow`], [`RethrowWhen`] | observed | observed | observed |
//! | [`Hide`] | moved to undeclared | passes | passes |

mod consume;
mod hide;
mod map;
mod rethrow;

pub use consume::{ConsumeDeclared, ConsumeFatal, ConsumeRecoverable};
pub(crate) use consume::discard;
pub use hide::Hide;
pub use map::{MapDeclared, MapFatal, MapRecoverable};
pub use rethrow::{Rethrow, RethrowWhen};
