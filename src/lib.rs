//! Shared abstractions for the GINI runtime facilities.
//!
//! This library defines the capabilities that the environment and logger
//! crates are parameterised over:
//! - [`facts::FactProvider`] answers OS-level questions (home, working and
//!   configuration directories) and performs the two directory mutations the
//!   facilities need. [`facts::OsFacts`] is the production implementation.
//! - [`fault::FaultHandler`] is invoked when a required fact is unavailable.
//!   Handlers must not return; [`fault::escalate`] enforces that contract.
//! - [`error::EnvError`] covers the few failures a caller can recover from.

pub mod error;
pub mod facts;
pub mod fault;

pub use error::EnvError;
pub use facts::{FactProvider, OsFacts};
pub use fault::{ChannelStep, Fault, FaultHandler, escalate};

/// Directory below a configuration base that holds GINI's configuration.
pub const CONFIG_SUFFIX: [&str; 2] = ["gini", "config"];

/// Directory below the configuration directory that holds log files.
pub const LOGGING_DIR_NAME: &str = "logs";
