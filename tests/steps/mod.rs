//! Step definitions for the behavioural scenarios.

mod environment_steps;
mod logger_steps;

pub use environment_steps::EnvironmentWorld;
pub use logger_steps::LoggerWorld;

use gini_lib::Fault;
use std::any::Any;

/// Outcome of an operation that may stop execution.
pub type Outcome<T> = Result<T, Box<dyn Any + Send>>;

/// The [`Fault`] an operation unwound with, if any.
pub fn fault_of<T>(outcome: &Outcome<T>) -> Option<&Fault> {
    outcome
        .as_ref()
        .err()
        .and_then(|p| Fault::from_payload(p.as_ref()))
}
