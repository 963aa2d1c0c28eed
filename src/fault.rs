//! Irrecoverable faults and their escalation.
//!
//! A fault is raised when the facilities cannot operate on the system in the
//! intended way. It is handed to a configured [`FaultHandler`], which must
//! divert control flow (terminate the process, unwind to a UI loop, ...).
//! [`escalate`] never returns: without a handler it unwinds with the
//! [`Fault`] as panic payload, and a handler that returns is itself treated
//! as a fault.

use crate::error::EnvError;
use std::any::Any;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Step of a log-file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStep {
    Open,
    Write,
    Close,
    Read,
    Reopen,
}

impl fmt::Display for ChannelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open log-file",
            Self::Write => "write log-file",
            Self::Close => "close log-file",
            Self::Read => "read log-file",
            Self::Reopen => "reopen log-file",
        })
    }
}

/// Conditions no caller is expected to recover from.
#[derive(Debug, Error)]
pub enum Fault {
    /// The home directory could not be determined.
    #[error("gini: env: no home directory: {0}")]
    NoHome(#[source] io::Error),
    /// The working directory could not be determined.
    #[error("gini: env: no working directory: {0}")]
    NoWorkingDir(#[source] io::Error),
    /// The logging directory could not be created while opening a channel.
    #[error("gini: log: create dir: {0}")]
    CreateLogDir(#[source] EnvError),
    /// A log-file operation of a file-backed channel failed.
    #[error("gini: log: {step} {}: {source}", path.display())]
    Channel {
        step: ChannelStep,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Fatal message raised explicitly by a caller.
    #[error("{0}")]
    Message(String),
    /// A fault handler returned instead of diverting control flow.
    #[error("gini: fault handler returned instead of stopping execution: {0}")]
    HandlerReturned(Box<Fault>),
}

impl Fault {
    /// The fault carried by a panic payload raised through [`escalate`].
    ///
    /// Intended for panic hooks and `catch_unwind` call sites: the default
    /// hook only prints `Box<dyn Any>` for such payloads.
    ///
    /// ```rust
    /// use gini_lib::Fault;
    ///
    /// std::panic::set_hook(Box::new(|info| {
    ///     if let Some(fault) = Fault::from_payload(info.payload()) {
    ///         eprintln!("{fault}");
    ///     }
    /// }));
    /// ```
    pub fn from_payload(payload: &(dyn Any + Send)) -> Option<&Self> {
        payload.downcast_ref::<Self>()
    }

    pub fn channel(step: ChannelStep, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Channel {
            step,
            path: path.into(),
            source,
        }
    }
}

/// Capability invoked with an irrecoverable [`Fault`].
///
/// Implementations must not return. Typical handlers terminate the process
/// or unwind to a top-level loop that owns recovery.
pub trait FaultHandler: Send + Sync {
    fn handle(&self, fault: &Fault);
}

impl<F> FaultHandler for F
where
    F: Fn(&Fault) + Send + Sync,
{
    fn handle(&self, fault: &Fault) {
        self(fault);
    }
}

/// Raise `fault` through `handler`, never returning to the caller.
///
/// Without a handler the fault itself becomes the panic payload. If the
/// handler returns, the payload is [`Fault::HandlerReturned`] wrapping the
/// original fault. The default panic hook cannot print such a payload, and
/// the `tracing` event emitted here is dropped when no subscriber is
/// installed, so hosts relying on unwinding should install a hook that
/// uses [`Fault::from_payload`].
pub fn escalate(handler: Option<&dyn FaultHandler>, fault: Fault) -> ! {
    tracing::error!(error = %fault, "escalating irrecoverable fault");
    let Some(handler) = handler else {
        std::panic::panic_any(fault);
    };
    handler.handle(&fault);
    tracing::error!("fault handler returned");
    std::panic::panic_any(Fault::HandlerReturned(Box::new(fault)))
}

#[cfg(test)]
mod tests {
    #![expect(clippy::expect_used, reason = "simplify test output")]
    use super::*;
    use rstest::rstest;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload_of(f: impl FnOnce()) -> Box<dyn std::any::Any + Send> {
        catch_unwind(AssertUnwindSafe(f)).expect_err("expected divergence")
    }

    #[test]
    fn unwinds_with_fault_without_handler() {
        let payload = payload_of(|| escalate(None, Fault::Message("boom".into())));
        let fault = Fault::from_payload(payload.as_ref()).expect("fault payload");
        assert_eq!(fault.to_string(), "boom");
    }

    #[test]
    fn other_payloads_are_not_faults() {
        let payload = payload_of(|| std::panic::panic_any(String::from("plain")));
        assert!(Fault::from_payload(payload.as_ref()).is_none());
    }

    fn divert(fault: &Fault) {
        std::panic::panic_any(format!("handled: {fault}"))
    }

    #[test]
    fn handler_diverting_is_honoured() {
        let handler: &dyn FaultHandler = &divert;
        let payload = payload_of(|| escalate(Some(handler), Fault::Message("boom".into())));
        let msg = payload.downcast::<String>().expect("string payload");
        assert_eq!(*msg, "handled: boom");
    }

    #[test]
    fn returning_handler_is_a_usage_fault() {
        let calls = AtomicUsize::new(0);
        let count = |_: &Fault| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let handler: &dyn FaultHandler = &count;
        let payload = payload_of(|| escalate(Some(handler), Fault::Message("boom".into())));
        let fault = payload.downcast::<Fault>().expect("fault payload");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        match *fault {
            Fault::HandlerReturned(inner) => assert!(matches!(*inner, Fault::Message(_))),
            other => panic!("unexpected fault: {other}"),
        }
    }

    #[rstest]
    #[case(ChannelStep::Open, "open log-file")]
    #[case(ChannelStep::Write, "write log-file")]
    #[case(ChannelStep::Close, "close log-file")]
    #[case(ChannelStep::Read, "read log-file")]
    #[case(ChannelStep::Reopen, "reopen log-file")]
    fn channel_faults_name_the_failed_step(#[case] step: ChannelStep, #[case] expected: &str) {
        let fault = Fault::channel(step, "/tmp/x.log", io::Error::other("mock"));
        let msg = fault.to_string();
        assert!(msg.contains(expected), "{msg}");
        assert!(msg.contains("/tmp/x.log"), "{msg}");
    }
}
