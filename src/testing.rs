//! Testing utilities for closers and decorators.
//!
//! This module provides scripted closers with a fixed outcome, a probe for
//! counting observer calls, and assertion macros for close results.
//!
//! # Examples
//!
//! ## Scripted closers
//!
//! ```rust
//! use closer::testing::ScriptedCloser;
//! use closer::{assert_declared, Closer, CloserExt};
//!
//! let inner = ScriptedCloser::declared(7u8);
//! let calls = inner.calls();
//! let mut closer = inner.map_declared(|code| Some(code * 2));
//!
//! assert_eq!(assert_declared!(closer.close()), 14);
//! assert_eq!(calls.get(), 1);
//! ```
//!
//! ## Probes
//!
//! ```rust
//! use closer::testing::{Probe, ScriptedCloser};
//! use closer::{assert_closed, Closer, CloserExt, FailureClass};
//!
//! let probe = Probe::new();
//! let mut closer = ScriptedCloser::<u8>::panicking("boom").consume_fatal(probe.on_failure());
//!
//! assert_closed!(closer.close());
//! assert_eq!(probe.last_class(), Some(FailureClass::Fatal));
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::closer::{CloseError, Closer};
use crate::failure::{Failure, FailureClass, Panic};

/// The outcome a [`ScriptedCloser`] produces on every call.
#[derive(Debug, Clone, PartialEq)]
pub enum Script<D> {
    /// Close successfully.
    Succeed,
    /// Fail with this declared value.
    Declared(D),
    /// Fail undeclared with a [`ScriptedError`] carrying this message.
    Undeclared(String),
    /// Panic with this message.
    Panic(String),
}

impl<D> Script<D> {
    /// The failure class this script raises, or `None` for success.
    pub fn class(&self) -> Option<FailureClass> {
        match self {
            Script::Succeed => None,
            Script::Declared(_) => Some(FailureClass::Declared),
            Script::Undeclared(_) => Some(FailureClass::Undeclared),
            Script::Panic(_) => Some(FailureClass::Fatal),
        }
    }
}

/// Undeclared error raised by [`ScriptedCloser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedError(pub String);

impl fmt::Display for ScriptedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for ScriptedError {}

/// Shared count of how many times a closer ran.
#[derive(Debug, Clone, Default)]
pub struct CallCount(Arc<AtomicUsize>);

impl CallCount {
    /// Current count.
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// A closer that produces the same scripted outcome on every call and
/// counts how often it ran.
///
/// Clones share the same [`CallCount`].
#[derive(Debug, Clone)]
pub struct ScriptedCloser<D> {
    script: Script<D>,
    calls: CallCount,
}

impl<D> ScriptedCloser<D> {
    /// A closer following `script`.
    pub fn new(script: Script<D>) -> Self {
        ScriptedCloser {
            script,
            calls: CallCount::default(),
        }
    }

    /// Always succeeds.
    pub fn succeeding() -> Self {
        Self::new(Script::Succeed)
    }

    /// Always fails with the declared value `d`.
    pub fn declared(d: D) -> Self {
        Self::new(Script::Declared(d))
    }

    /// Always fails undeclared with `message`.
    pub fn undeclared(message: impl Into<String>) -> Self {
        Self::new(Script::Undeclared(message.into()))
    }

    /// Always panics with `message`.
    pub fn panicking(message: impl Into<String>) -> Self {
        Self::new(Script::Panic(message.into()))
    }

    /// The script this closer follows.
    pub fn script(&self) -> &Script<D> {
        &self.script
    }

    /// Handle on the call counter, valid after the closer is moved into a
    /// decorator.
    pub fn calls(&self) -> CallCount {
        self.calls.clone()
    }
}

impl<D: Clone> Closer for ScriptedCloser<D> {
    type Declared = D;

    fn close(&mut self) -> Result<(), CloseError<D>> {
        self.calls.bump();
        match &self.script {
            Script::Succeed => Ok(()),
            Script::Declared(d) => Err(CloseError::Declared(d.clone())),
            Script::Undeclared(msg) => Err(CloseError::undeclared(ScriptedError(msg.clone()))),
            Script::Panic(msg) => panic!("{}", msg),
        }
    }
}

/// Counts observer calls and remembers the class of the last failure seen.
///
/// The callback builders return closures that share the probe's state, so
/// the probe can be inspected after the callback has moved into a
/// decorator.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    hits: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<FailureClass>>>,
}

impl Probe {
    /// A probe with no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many failures were recorded.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// The class of the most recent failure.
    pub fn last_class(&self) -> Option<FailureClass> {
        *self.last.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Record one failure of `class`.
    pub fn record(&self, class: FailureClass) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap_or_else(|p| p.into_inner()) = Some(class);
    }

    /// Observer for `consume_declared`.
    pub fn on_declared<D>(&self) -> impl FnMut(D) + Send {
        let probe = self.clone();
        move |_| probe.record(FailureClass::Declared)
    }

    /// Observer for `consume_recoverable`.
    pub fn on_close_error<D>(&self) -> impl FnMut(CloseError<D>) + Send {
        let probe = self.clone();
        move |err| probe.record(err.class())
    }

    /// Observer for `consume_fatal`.
    pub fn on_failure<D>(&self) -> impl FnMut(Failure<D>) + Send {
        let probe = self.clone();
        move |failure| probe.record(failure.class())
    }

    /// Observer for `rethrow`.
    pub fn observer<D>(&self) -> impl FnMut(&Failure<D>) + Send {
        let probe = self.clone();
        move |failure| probe.record(failure.class())
    }

    /// Predicate for `rethrow_when` that records the failure and answers
    /// `answer`.
    pub fn predicate<D>(&self, answer: bool) -> impl FnMut(&Failure<D>) -> bool + Send {
        let probe = self.clone();
        move |failure| {
            probe.record(failure.class());
            answer
        }
    }
}

/// Run `f`, turning a panic into `Err` with its message.
///
/// Non-string payloads are reported as `"<non-string panic>"`.
pub fn catch_panic_message<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        Panic::new(payload)
            .message()
            .map(str::to_owned)
            .unwrap_or_else(|| "<non-string panic>".to_string())
    })
}

/// Assert that a close result is a success.
///
/// # Example
///
/// ```rust
/// use closer::{assert_closed, infallible, Closer};
///
/// assert_closed!(infallible(|| ()).close());
/// ```
#[macro_export]
macro_rules! assert_closed {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Ok(()) => {}
            ::core::result::Result::Err(e) => {
                panic!("Expected close to succeed, got: {:?}", e);
            }
        }
    };
}

/// Assert that a close result is a declared failure, returning its value.
///
/// # Example
///
/// ```rust
/// use closer::{assert_declared, from_fn, Closer};
///
/// let code = assert_declared!(from_fn(|| Err::<(), _>(7)).close());
/// assert_eq!(code, 7);
/// ```
#[macro_export]
macro_rules! assert_declared {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Err($crate::CloseError::Declared(d)) => d,
            ::core::result::Result::Err($crate::CloseError::Undeclared(e)) => {
                panic!("Expected declared failure, got undeclared: {:?}", e);
            }
            ::core::result::Result::Ok(()) => {
                panic!("Expected declared failure, got success");
            }
        }
    };
}

/// Assert that a close result is an undeclared failure, returning the
/// boxed error.
///
/// # Example
///
/// ```rust
/// use closer::{assert_undeclared, CloseError, Closer};
///
/// let mut closer = || -> Result<(), CloseError<u8>> { Err(CloseError::undeclared("eof")) };
/// assert_eq!(assert_undeclared!(closer.close()).to_string(), "eof");
/// ```
#[macro_export]
macro_rules! assert_undeclared {
    ($result:expr) => {
        match $result {
            ::core::result::Result::Err($crate::CloseError::Undeclared(e)) => e,
            ::core::result::Result::Err($crate::CloseError::Declared(d)) => {
                panic!("Expected undeclared failure, got declared: {:?}", d);
            }
            ::core::result::Result::Ok(()) => {
                panic!("Expected undeclared failure, got success");
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_closer_counts_every_call() {
        let mut closer = ScriptedCloser::<u8>::succeeding();
        let calls = closer.calls();
        assert_closed!(closer.close());
        assert_closed!(closer.close());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let closer = ScriptedCloser::declared(1u8);
        let calls = closer.calls();
        let mut copy = closer.clone();
        assert_eq!(assert_declared!(copy.close()), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_script_class() {
        assert_eq!(Script::<u8>::Succeed.class(), None);
        assert_eq!(
            ScriptedCloser::<u8>::undeclared("x").script().class(),
            Some(FailureClass::Undeclared)
        );
        assert_eq!(
            ScriptedCloser::<u8>::panicking("x").script().class(),
            Some(FailureClass::Fatal)
        );
    }

    #[test]
    fn test_undeclared_is_scripted_error() {
        let err = assert_undeclared!(ScriptedCloser::<u8>::undeclared("reset").close());
        assert_eq!(
            err.downcast_ref::<ScriptedError>(),
            Some(&ScriptedError("reset".to_string()))
        );
    }

    #[test]
    fn test_catch_panic_message() {
        assert_eq!(catch_panic_message(|| 3), Ok(3));
        let mut closer = ScriptedCloser::<u8>::panicking("boom");
        assert_eq!(catch_panic_message(|| closer.close()).unwrap_err(), "boom");
        let opaque = catch_panic_message(|| panic::panic_any(5u8));
        assert_eq!(opaque.unwrap_err(), "<non-string panic>");
    }

    #[test]
    fn test_probe_records() {
        let probe = Probe::new();
        assert_eq!(probe.last_class(), None);

        let mut predicate = probe.predicate::<u8>(false);
        assert!(!predicate(&Failure::Declared(1)));
        probe.record(FailureClass::Fatal);

        assert_eq!(probe.hits(), 2);
        assert_eq!(probe.last_class(), Some(FailureClass::Fatal));
    }

    #[test]
    #[should_panic(expected = "Expected declared failure, got success")]
    fn test_assert_declared_panics_on_success() {
        assert_declared!(ScriptedCloser::<u8>::succeeding().close());
    }

    #[test]
    #[should_panic(expected = "Expected close to succeed")]
    fn test_assert_closed_panics_on_failure() {
        assert_closed!(ScriptedCloser::declared(1u8).close());
    }
}
