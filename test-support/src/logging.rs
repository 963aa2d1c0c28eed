//! Logging utilities for tests.
//!
//! Captures `tracing` output in memory so tests can assert on the
//! diagnostics the facilities emit, without touching the process
//! environment or installing a global subscriber.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Shared in-memory sink for formatted `tracing` events.
#[derive(Clone, Debug, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap_or_else(PoisonError::into_inner)).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local JSON subscriber using `filter`, returning
/// the captured output alongside `f`'s result.
///
/// # Examples
///
/// ```rust
/// use test_support::logging::capture_json;
///
/// let (logs, ()) = capture_json("info", || tracing::info!(channel = "inf", "hello"));
/// assert!(logs.contains("hello"));
/// ```
pub fn capture_json<R>(filter: &str, f: impl FnOnce() -> R) -> (String, R) {
    let logs = CapturedLogs::default();
    let subscriber = fmt()
        .json()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(logs.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}
