//! Test support utilities.
//!
//! Deterministic stand-ins for the capabilities the GINI facilities are
//! parameterised over, plus helpers shared by unit and behavioural tests.

pub mod env_guard;
pub mod facts;
pub mod fault;
pub mod logging;

pub use facts::{Answer, Fact, StubFacts};
pub use fault::{Diverted, FaultRecorder, expect_divergence, expect_fault};

/// Create a fresh temporary directory to serve as an isolated root.
///
/// The directory lives under the platform temporary root, so an
/// environment rooted here classifies as temporary.
///
/// # Panics
///
/// Panics if the directory cannot be created.
#[expect(clippy::expect_used, reason = "simplify test setup")]
pub fn temp_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temporary root")
}
