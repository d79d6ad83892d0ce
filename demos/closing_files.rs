//! Closing Files Example
//!
//! Demonstrates failure policies for releasing file handles.
//!
//! Shows practical patterns including:
//! - Mapping a declared close failure to a domain error
//! - Wrapping failures in `NotClosed`
//! - Ignoring best-effort cleanup failures
//! - Rethrowing only the failures a caller cares about
//! - Scoped use with `using` and `CloseGuard`

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use closer::{
    from_fn, infallible, using, CloseError, CloseGuard, Closer, CloserExt, Declared2, FailureClass,
    OneOf2,
};

// ==================== Fixtures ====================

fn demo_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("closer_demo_{}.txt", name))
}

/// A log file that is flushed and synced on close.
struct LogFile {
    path: PathBuf,
    file: Option<File>,
}

impl LogFile {
    fn create(name: &str) -> io::Result<Self> {
        let path = demo_path(name);
        let file = File::create(&path)?;
        Ok(LogFile {
            path,
            file: Some(file),
        })
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => writeln!(file, "{}", line),
            None => Err(io::Error::other("log already closed")),
        }
    }
}

impl Closer for LogFile {
    type Declared = io::Error;

    fn close(&mut self) -> Result<(), CloseError<io::Error>> {
        match self.file.take() {
            Some(mut file) => {
                file.flush()?;
                file.sync_all()?;
                Ok(())
            }
            None => Err(CloseError::undeclared("log closed twice")),
        }
    }
}

#[derive(Debug)]
enum StoreError {
    Io(io::ErrorKind),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(kind) => write!(f, "store I/O failure: {}", kind),
        }
    }
}

// ==================== Mapping ====================

/// Example 1: Map declared failures to a domain error
fn example_map_declared() -> io::Result<()> {
    println!("\n=== Example 1: Map Declared Failures ===");

    let mut log = LogFile::create("map")?;
    log.append("first entry")?;
    let path = log.path.clone();

    let mut closer = log.map_declared(|err| Some(StoreError::Io(err.kind())));
    match closer.close() {
        Ok(()) => println!("  Closed cleanly"),
        Err(CloseError::Declared(e)) => println!("  Domain error: {}", e),
        Err(CloseError::Undeclared(e)) => println!("  Unexpected: {}", e),
    }

    // A second close is undeclared and passes through the mapper untouched.
    match closer.close() {
        Err(CloseError::Undeclared(e)) => println!("  Second close: {}", e),
        other => println!("  Second close: {:?}", other),
    }

    fs::remove_file(path)
}

/// Example 2: Wrap any failure, panics included, in NotClosed
fn example_wrap_fatal() {
    println!("\n=== Example 2: Wrap Every Failure ===");

    let mut closer = infallible(|| panic!("file table corrupted")).wrap_fatal();
    match closer.close() {
        Err(CloseError::Declared(not_closed)) => {
            println!("  {}", not_closed);
            println!("  Cause class: {}", not_closed.cause().class());
        }
        other => println!("  Unexpected: {:?}", other.is_ok()),
    }
}

// ==================== Consuming ====================

/// Example 3: Best-effort cleanup that never fails the caller
fn example_ignore() {
    println!("\n=== Example 3: Best-Effort Cleanup ===");

    let stale = demo_path("never_created");
    let mut closer = from_fn(move || fs::remove_file(&stale)).ignore_recoverable();
    println!("  Cleanup result: {:?}", closer.close());

    let mut logged = Vec::new();
    let mut closer = from_fn(|| fs::remove_file(demo_path("also_missing")))
        .consume_declared(|err| logged.push(err.kind()));
    closer.close().ok();
    drop(closer);
    println!("  Logged kinds: {:?}", logged);
}

// ==================== Rethrowing ====================

#[derive(Debug)]
struct Timeout;
#[derive(Debug)]
struct Refused;

/// Example 4: Only rethrow the declared kind the caller can act on
fn example_rethrow_when() {
    println!("\n=== Example 4: Conditional Rethrow ===");

    let attempts = [OneOf2::First(Timeout), OneOf2::Second(Refused)];

    for kind in attempts {
        let mut pending = Some(kind);
        let mut closer = (move || -> Result<(), CloseError<Declared2<Timeout, Refused>>> {
            match pending.take() {
                Some(kind) => Err(kind.into()),
                None => Ok(()),
            }
        })
        .rethrow(|failure| println!("  Observed {} failure", failure.class()))
        .rethrow_when(|failure| {
            failure.class() == FailureClass::Declared
                && failure.declared().map(OneOf2::position) == Some(1)
        });

        println!("  Result: {:?}", closer.close());
    }
}

// ==================== Scopes ====================

/// Example 5: using and CloseGuard
fn example_scopes() -> io::Result<()> {
    println!("\n=== Example 5: Scoped Use ===");

    let log = LogFile::create("scoped")?;
    let path = log.path.clone();
    let result = using(log, |log| {
        log.append("inside scope")?;
        Ok::<_, io::Error>("written")
    });
    println!("  using result: {:?}", result);

    {
        let mut guard = CloseGuard::new(LogFile::create("guarded")?);
        guard.append("guarded entry")?;
        println!("  Guard will close on scope exit");
    }

    fs::remove_file(path)?;
    fs::remove_file(demo_path("guarded"))
}

fn main() -> io::Result<()> {
    example_map_declared()?;
    example_wrap_fatal();
    example_ignore();
    example_rethrow_when();
    example_scopes()?;
    Ok(())
}
