//! Process-wide sink for the diagnostics the GINI facilities emit.
//!
//! Environment resolution, channel creation and fault escalation are
//! reported through `tracing`, as are messages written to a detached
//! [`crate::Logger`]. Hosts that do not install their own subscriber can
//! call [`init`]; the filter is read from `RUST_LOG`.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Install a subscriber writing to standard error.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
///
/// # Examples
///
/// ```rust,no_run
/// gini_log::diagnostics::init().ok();
/// tracing::debug!("diagnostics enabled");
/// ```
pub fn init() -> Result<(), TryInitError> {
    init_with_writer(std::io::stderr)
}

/// Install a subscriber writing to `writer`.
///
/// # Errors
///
/// Returns [`TryInitError`] if a global subscriber is already installed.
pub fn init_with_writer<W>(writer: W) -> Result<(), TryInitError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .finish()
        .try_init()
}
