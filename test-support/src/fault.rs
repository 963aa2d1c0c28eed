//! Fault handler fixtures.
//!
//! A [`FaultRecorder`] remembers every fault it is handed. A diverting
//! recorder then unwinds with a [`Diverted`] payload, which stands in for
//! the process termination a production handler would perform. A returning
//! recorder violates the handler contract on purpose.

use gini_lib::{Fault, FaultHandler};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

/// Panic payload raised by a diverting [`FaultRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diverted(pub String);

/// [`FaultHandler`] that records fault messages.
#[derive(Debug, Default)]
pub struct FaultRecorder {
    seen: Mutex<Vec<String>>,
    returns: bool,
}

impl FaultRecorder {
    /// Recorder that stops execution by unwinding with [`Diverted`].
    pub fn diverting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Recorder that returns normally, breaking the handler contract.
    pub fn returning() -> Arc<Self> {
        Arc::new(Self {
            returns: true,
            ..Self::default()
        })
    }

    /// Messages of all faults handled so far.
    pub fn messages(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Message of the most recent fault, or an empty string.
    pub fn last(&self) -> String {
        self.messages().pop().unwrap_or_default()
    }
}

impl FaultHandler for FaultRecorder {
    fn handle(&self, fault: &Fault) {
        let msg = fault.to_string();
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(msg.clone());
        if !self.returns {
            std::panic::panic_any(Diverted(msg));
        }
    }
}

/// Run `f` and return its panic payload.
///
/// # Panics
///
/// Panics if `f` returns normally.
pub fn expect_divergence<R>(f: impl FnOnce() -> R) -> Box<dyn Any + Send> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected execution to stop"),
        Err(payload) => payload,
    }
}

/// Run `f` and return the [`Fault`] it unwound with.
///
/// # Panics
///
/// Panics if `f` returns normally or unwinds with another payload.
pub fn expect_fault<R>(f: impl FnOnce() -> R) -> Fault {
    match expect_divergence(f).downcast::<Fault>() {
        Ok(fault) => *fault,
        Err(other) => panic!("expected a fault payload, got {}", describe(other.as_ref())),
    }
}

fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(d) = payload.downcast_ref::<Diverted>() {
        format!("Diverted({})", d.0)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        String::from("<opaque payload>")
    }
}
