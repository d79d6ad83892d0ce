//! Demonstrates tracing integration with closers
//!
//! Run with: cargo run --example tracing_demo --features tracing

use closer::{infallible, using, CloseError, CloseGuard, Closer, CloserExt};

fn main() {
    // Set up tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting tracing demo");

    // Decorators log each failure they intercept at debug level
    let mut closer = (|| -> Result<(), CloseError<&'static str>> { Err("flush timed out".into()) })
        .rethrow(|failure| tracing::info!("observed: {}", failure))
        .ignore_declared();
    let _ = closer.close();

    let mut closer = infallible(|| panic!("handle table corrupted")).ignore_fatal();
    let _ = closer.close();

    // Scopes log close failures they cannot return
    let result = using(
        || -> Result<(), CloseError<&'static str>> { Err("socket already reset".into()) },
        |_| Err::<(), _>("request rejected"),
    );
    tracing::info!("Scope result: {:?}", result);

    {
        let _guard = CloseGuard::new(|| -> Result<(), CloseError<&'static str>> {
            Err(CloseError::undeclared("lock file missing"))
        });
    }

    tracing::info!("Tracing demo finished");
}
