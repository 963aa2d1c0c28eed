//! Named, lazily created log channels for a GINI instance.
//!
//! A [`Logger`] wraps an [`gini_env::Environment`] and opens a channel the
//! first time a name is written to. Channels of a temporary environment are
//! kept in memory unless persistence is requested; all others are written
//! to `<logging directory>/<name>.log`. [`Logger::read`] returns a channel's
//! accumulated content without losing later writes.
//!
//! # Examples
//! ```rust,no_run
//! use std::sync::Arc;
//! use gini_env::Environment;
//! use gini_log::{Logger, INF};
//!
//! let logger = Logger::new(Arc::new(Environment::new()));
//! logger.write(INF, "started");
//! assert!(logger.read(INF).contains("started"));
//! ```

mod channel;
pub mod diagnostics;
pub mod io;
pub mod logger;
pub mod profile;

pub use io::{FsIo, LogIo, OpenMode};
pub use logger::Logger;
pub use profile::Profile;

/// Suffix of log files written by a [`Logger`].
pub const FILE_SUFFIX: &str = "log";

/// Conventional name of the error channel.
pub const ERR: &str = "err";

/// Conventional name of the informational channel.
pub const INF: &str = "inf";

/// Conventional name of the security channel.
pub const SEC: &str = "sec";
