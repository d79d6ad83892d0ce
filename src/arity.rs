//! Declared-kind sets of arity 0 through 5.
//!
//! A closer's `Declared` type is a single sum type. The aliases here name
//! the common shapes:
//!
//! | arity | `Declared` |
//! |-------|------------|
//! | 0 | [`Declared0`] (`Infallible`) |
//! | 1 | [`Declared1<E1>`] (`E1` itself) |
//! | 2..5 | [`OneOf2`] .. [`OneOf5`] |
//!
//! ```rust
//! use closer::{CloseError, Closer, Declared2, OneOf2};
//!
//! #[derive(Debug)]
//! struct Timeout;
//! #[derive(Debug)]
//! struct Refused;
//!
//! let mut closer = || -> Result<(), CloseError<Declared2<Timeout, Refused>>> {
//!     Err(CloseError::Declared(OneOf2::Second(Refused)))
//! };
//!
//! let err = closer.close().unwrap_err();
//! assert_eq!(err.declared().map(OneOf2::position), Some(2));
//! ```

use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt;

/// No declared kinds.
pub type Declared0 = Infallible;

/// Exactly one declared kind.
pub type Declared1<E1> = E1;

/// Two declared kinds.
pub type Declared2<E1, E2> = OneOf2<E1, E2>;

/// Three declared kinds.
pub type Declared3<E1, E2, E3> = OneOf3<E1, E2, E3>;

/// Four declared kinds.
pub type Declared4<E1, E2, E3, E4> = OneOf4<E1, E2, E3, E4>;

/// Five declared kinds.
pub type Declared5<E1, E2, E3, E4, E5> = OneOf5<E1, E2, E3, E4, E5>;

// Macro for generating the positional sum types
macro_rules! impl_one_of {
    ($(#[$meta:meta])* $name:ident, $arity:expr; $($pos:expr => $variant:ident $T:ident),+) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name<$($T),+> {
            $(
                #[doc = concat!("Declared kind number ", stringify!($pos), ".")]
                $variant($T),
            )+
        }

        impl<$($T),+> $name<$($T),+> {
            /// Number of declared kinds in this set.
            pub const ARITY: usize = $arity;

            /// One-based position of the kind this value holds.
            pub fn position(&self) -> usize {
                match self {
                    $($name::$variant(_) => $pos,)+
                }
            }
        }

        impl<$($T: fmt::Display),+> fmt::Display for $name<$($T),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant(e) => e.fmt(f),)+
                }
            }
        }

        impl<$($T: StdError + 'static),+> StdError for $name<$($T),+> {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                match self {
                    $($name::$variant(e) => e.source(),)+
                }
            }
        }
    };
}

impl_one_of!(
    /// One of two declared kinds.
    OneOf2, 2;
    1 => First E1, 2 => Second E2
);
impl_one_of!(
    /// One of three declared kinds.
    OneOf3, 3;
    1 => First E1, 2 => Second E2, 3 => Third E3
);
impl_one_of!(
    /// One of four declared kinds.
    OneOf4, 4;
    1 => First E1, 2 => Second E2, 3 => Third E3, 4 => Fourth E4
);
impl_one_of!(
    /// One of five declared kinds.
    OneOf5, 5;
    1 => First E1, 2 => Second E2, 3 => Third E3, 4 => Fourth E4, 5 => Fifth E5
);
