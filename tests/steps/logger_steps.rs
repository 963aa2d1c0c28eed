//! Behavioural steps for log channels.
#![expect(clippy::expect_used, reason = "simplify test failure output")]

use super::{Outcome, fault_of};
use cucumber::{World, given, then, when};
use gini_env::Environment;
use gini_lib::Fault;
use gini_log::{Logger, Profile};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use test_support::{FaultRecorder, temp_root};

#[derive(Debug, Default, World)]
pub struct LoggerWorld {
    root: Option<TempDir>,
    logger: Option<Logger>,
    stopped: Option<Outcome<()>>,
}

impl LoggerWorld {
    fn logger(&self) -> &Logger {
        self.logger.as_ref().expect("logger set")
    }

    fn log_file(&self, channel: &str) -> PathBuf {
        let env = self.logger().environment().expect("logger has an environment");
        env.logging_directory().join(format!("{channel}.{}", gini_log::FILE_SUFFIX))
    }

    fn start(&mut self, persist: bool) {
        let root = temp_root();
        let env = Arc::new(Environment::new().with_root(root.path()));
        self.logger = Some(Logger::new(env).with_persist_temporary(persist));
        self.root = Some(root);
    }
}

#[given("a logger for a fresh temporary root")]
fn logger_for_temporary_root(world: &mut LoggerWorld) {
    world.start(false);
}

#[given("a logger for a fresh temporary root persisting temporary logs")]
fn persisting_logger(world: &mut LoggerWorld) {
    world.start(true);
}

#[given("a logger fault handler that returns")]
fn returning_logger_handler(world: &mut LoggerWorld) {
    world.logger().set_fault_handler(FaultRecorder::returning());
}

#[when(regex = r#"^"(.+)" is written to channel "(.+)"$"#)]
fn write_message(world: &mut LoggerWorld, message: String, channel: String) {
    world.logger().write(&channel, message);
}

#[when(regex = r#"^the logger raises the fatal message "(.+)"$"#)]
fn raise_fatal(world: &mut LoggerWorld, message: String) {
    let logger = world.logger();
    let outcome: Outcome<()> = catch_unwind(AssertUnwindSafe(|| {
        logger.fatal(&message);
    }));
    world.stopped = Some(outcome);
}

#[then(regex = r#"^reading channel "(.+)" yields "(.+)"$"#)]
fn read_yields(world: &mut LoggerWorld, channel: String, expected: String) {
    let content = world.logger().read(&channel);
    assert!(content.contains(&expected), "{content:?}");
}

#[then(regex = r#"^channel "(.+)" is in memory$"#)]
fn in_memory(world: &mut LoggerWorld, channel: String) {
    assert!(world.logger().is_in_memory(&channel));
}

#[then(regex = r#"^channel "(.+)" is not in memory$"#)]
fn not_in_memory(world: &mut LoggerWorld, channel: String) {
    assert!(!world.logger().is_in_memory(&channel));
}

#[then(regex = r#"^no log file exists for channel "(.+)"$"#)]
fn no_log_file(world: &mut LoggerWorld, channel: String) {
    assert!(!world.log_file(&channel).exists());
}

#[then(regex = r#"^the log file for channel "(.+)" contains "(.+)"$"#)]
fn log_file_contains(world: &mut LoggerWorld, channel: String, expected: String) {
    let content = std::fs::read_to_string(world.log_file(&channel)).expect("read log file");
    assert!(content.contains(&expected), "{content:?}");
}

#[then(regex = r#"^channel "(.+)" uses the (error|default) profile$"#)]
fn uses_profile(world: &mut LoggerWorld, channel: String, profile: String) {
    let expected = if profile == "error" {
        Profile::Error
    } else {
        Profile::Default
    };
    assert_eq!(world.logger().profile(&channel), Some(expected));
}

#[then("the operation stops with a handler usage fault")]
fn stops_with_usage_fault(world: &mut LoggerWorld) {
    let outcome = world.stopped.as_ref().expect("fatal raised");
    assert!(matches!(fault_of(outcome), Some(Fault::HandlerReturned(_))));
}
