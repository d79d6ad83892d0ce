//! Every decorator against every failure class, for declared arities 0 through 5.

use closer::testing::{catch_panic_message, Probe, ScriptedCloser};
use closer::{
    assert_closed, assert_declared, assert_undeclared, Closer, CloserExt, FailureClass, OneOf2,
    OneOf3, OneOf4, OneOf5, Panic,
};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::fmt::{self, Debug};

macro_rules! kinds {
    ($($name:ident => $msg:literal),+ $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct $name;

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str($msg)
            }
        }

        impl StdError for $name {}
    )+};
}

kinds!(
    K1 => "lock held",
    K2 => "flush failed",
    K3 => "peer gone",
    K4 => "quota exceeded",
    K5 => "handle leaked",
);

fn success_passes_every_decorator<D: Clone + Debug>() {
    let inner = ScriptedCloser::<D>::succeeding();
    let probe = Probe::new();

    assert_closed!(inner.clone().map_declared(Some).close());
    assert_closed!(inner.clone().map_recoverable(Some).close());
    assert_closed!(inner.clone().map_fatal(Some).close());
    assert_closed!(inner.clone().wrap_declared().close());
    assert_closed!(inner.clone().wrap_recoverable().close());
    assert_closed!(inner.clone().wrap_fatal().close());
    assert_closed!(inner.clone().consume_declared(probe.on_declared()).close());
    assert_closed!(inner.clone().consume_recoverable(probe.on_close_error()).close());
    assert_closed!(inner.clone().consume_fatal(probe.on_failure()).close());
    assert_closed!(inner.clone().ignore_declared().close());
    assert_closed!(inner.clone().ignore_recoverable().close());
    assert_closed!(inner.clone().ignore_fatal().close());
    assert_closed!(inner.clone().rethrow(probe.observer()).close());
    assert_closed!(inner.clone().rethrow_when(probe.predicate(true)).close());

    assert_eq!(probe.hits(), 0);
    assert_eq!(inner.calls().get(), 14);
}

fn undeclared_respects_breadth<D: Clone + Debug>() {
    let inner = ScriptedCloser::<D>::undeclared("reset");
    let probe = Probe::new();

    // Declared breadth lets it through.
    let err = assert_undeclared!(inner.clone().map_declared(Some).close());
    assert_eq!(err.to_string(), "reset");
    assert_undeclared!(inner.clone().wrap_declared().close());
    assert_undeclared!(inner.clone().consume_declared(probe.on_declared()).close());
    assert_undeclared!(inner.clone().ignore_declared().close());
    assert_eq!(probe.hits(), 0);

    // Recoverable and fatal breadths intercept.
    let err = assert_declared!(inner.clone().map_recoverable(Some).close());
    assert!(err.is_undeclared());
    let failure = assert_declared!(inner.clone().map_fatal(Some).close());
    assert_eq!(failure.class(), FailureClass::Undeclared);
    let not_closed = assert_declared!(inner.clone().wrap_recoverable().close());
    assert_eq!(not_closed.cause().class(), FailureClass::Undeclared);
    let not_closed = assert_declared!(inner.clone().wrap_fatal().close());
    assert_eq!(not_closed.cause().class(), FailureClass::Undeclared);
    assert_closed!(inner.clone().consume_recoverable(probe.on_close_error()).close());
    assert_closed!(inner.clone().consume_fatal(probe.on_failure()).close());
    assert_closed!(inner.clone().ignore_recoverable().close());
    assert_closed!(inner.clone().ignore_fatal().close());

    // Rethrow sees everything.
    assert_undeclared!(inner.clone().rethrow(probe.observer()).close());
    assert_undeclared!(inner.clone().rethrow_when(probe.predicate(true)).close());
    assert_closed!(inner.clone().rethrow_when(probe.predicate(false)).close());

    assert_eq!(probe.hits(), 5);
    assert_eq!(probe.last_class(), Some(FailureClass::Undeclared));
    assert_eq!(inner.calls().get(), 15);
}

fn panic_respects_breadth<D: Clone + Debug>() {
    let inner = ScriptedCloser::<D>::panicking("boom");
    let probe = Probe::new();
    let unwinds = |result: Result<Result<(), String>, String>| result.unwrap_err() == "boom";

    // Declared and recoverable breadths let it unwind.
    let mut c = inner.clone().map_declared(Some);
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    let mut c = inner.clone().map_recoverable(Some);
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    let mut c = inner.clone().wrap_recoverable();
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    let mut c = inner.clone().consume_declared(probe.on_declared());
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    let mut c = inner.clone().consume_recoverable(probe.on_close_error());
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    let mut c = inner.clone().ignore_recoverable();
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    assert_eq!(probe.hits(), 0);

    // Fatal breadth intercepts.
    let failure = assert_declared!(inner.clone().map_fatal(Some).close());
    assert_eq!(failure.panic().and_then(Panic::message), Some("boom"));
    let not_closed = assert_declared!(inner.clone().wrap_fatal().close());
    assert!(not_closed.cause().is_fatal());
    assert_closed!(inner.clone().consume_fatal(probe.on_failure()).close());
    assert_closed!(inner.clone().ignore_fatal().close());

    // Rethrow resumes the same panic, or swallows it.
    let mut c = inner.clone().rethrow(probe.observer());
    assert!(unwinds(catch_panic_message(|| c.close().map_err(|e| format!("{:?}", e)))));
    assert_closed!(inner.clone().rethrow_when(probe.predicate(false)).close());

    assert_eq!(probe.hits(), 3);
    assert_eq!(probe.last_class(), Some(FailureClass::Fatal));
    assert_eq!(inner.calls().get(), 12);
}

fn declared_respects_breadth<D>(sample: D)
where
    D: Clone + Debug + PartialEq + StdError + Send + Sync + 'static,
{
    let inner = ScriptedCloser::declared(sample.clone());
    let probe = Probe::new();

    assert_eq!(assert_declared!(inner.clone().map_declared(Some).close()), sample);
    assert_closed!(inner.clone().map_declared(|_: D| None::<()>).close());
    let err = assert_declared!(inner.clone().map_recoverable(Some).close());
    assert_eq!(err.into_declared(), Some(sample.clone()));
    let failure = assert_declared!(inner.clone().map_fatal(Some).close());
    assert_eq!(failure.declared(), Some(&sample));

    let not_closed = assert_declared!(inner.clone().wrap_declared().close());
    assert_eq!(not_closed.into_cause(), sample);
    let not_closed = assert_declared!(inner.clone().wrap_recoverable().close());
    assert_eq!(not_closed.cause().declared(), Some(&sample));
    let not_closed = assert_declared!(inner.clone().wrap_fatal().close());
    assert_eq!(not_closed.cause().declared(), Some(&sample));

    assert_closed!(inner.clone().consume_declared(probe.on_declared()).close());
    assert_closed!(inner.clone().consume_recoverable(probe.on_close_error()).close());
    assert_closed!(inner.clone().consume_fatal(probe.on_failure()).close());
    assert_closed!(inner.clone().ignore_declared().close());
    assert_closed!(inner.clone().ignore_recoverable().close());
    assert_closed!(inner.clone().ignore_fatal().close());

    assert_eq!(assert_declared!(inner.clone().rethrow(probe.observer()).close()), sample);
    assert_eq!(
        assert_declared!(inner.clone().rethrow_when(probe.predicate(true)).close()),
        sample
    );
    assert_closed!(inner.clone().rethrow_when(probe.predicate(false)).close());

    let hidden = assert_undeclared!(inner.clone().hide().close());
    assert_eq!(hidden.downcast_ref::<D>(), Some(&sample));

    assert_eq!(probe.hits(), 6);
    assert_eq!(probe.last_class(), Some(FailureClass::Declared));
    assert_eq!(inner.calls().get(), 17);
}

macro_rules! arity_suite {
    ($name:ident, $declared:ty) => {
        mod $name {
            use super::*;

            #[test]
            fn success_passes_every_decorator() {
                super::success_passes_every_decorator::<$declared>();
            }

            #[test]
            fn undeclared_respects_breadth() {
                super::undeclared_respects_breadth::<$declared>();
            }

            #[test]
            fn panic_respects_breadth() {
                super::panic_respects_breadth::<$declared>();
            }
        }
    };
    ($name:ident, $declared:ty, $sample:expr) => {
        mod $name {
            use super::*;

            #[test]
            fn success_passes_every_decorator() {
                super::success_passes_every_decorator::<$declared>();
            }

            #[test]
            fn undeclared_respects_breadth() {
                super::undeclared_respects_breadth::<$declared>();
            }

            #[test]
            fn panic_respects_breadth() {
                super::panic_respects_breadth::<$declared>();
            }

            #[test]
            fn declared_respects_breadth() {
                let sample: $declared = $sample;
                super::declared_respects_breadth(sample);
            }
        }
    };
}

arity_suite!(arity0, Infallible);
arity_suite!(arity1, K1, K1);
arity_suite!(arity2, OneOf2<K1, K2>, OneOf2::Second(K2));
arity_suite!(arity3, OneOf3<K1, K2, K3>, OneOf3::Third(K3));
arity_suite!(arity4, OneOf4<K1, K2, K3, K4>, OneOf4::First(K1));
arity_suite!(arity5, OneOf5<K1, K2, K3, K4, K5>, OneOf5::Fifth(K5));

#[test]
fn declared_kind_position_survives_decoration() {
    let inner = ScriptedCloser::declared(OneOf5::<K1, K2, K3, K4, K5>::Fourth(K4));
    let kind = assert_declared!(inner.rethrow(|_| {}).close());
    assert_eq!(kind.position(), 4);
    assert_eq!(kind.to_string(), "quota exceeded");
}

#[test]
fn arity_zero_decorated_closers_declare_nothing() {
    fn declares_nothing<C: Closer<Declared = Infallible>>(_: &C) {}

    let inner = ScriptedCloser::declared(K1);
    declares_nothing(&inner.clone().ignore_declared());
    declares_nothing(&inner.clone().consume_fatal(|_| {}));
    declares_nothing(&inner.hide());
}
