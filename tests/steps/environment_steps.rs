//! Behavioural steps for environment location resolution.
#![expect(clippy::expect_used, reason = "simplify test failure output")]

use super::{Outcome, fault_of};
use cucumber::{World, given, then, when};
use gini_env::Environment;
use gini_lib::{EnvError, Fault};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use test_support::{Answer, Fact, FaultRecorder, StubFacts, temp_root};

#[derive(Debug, Default, World)]
pub struct EnvironmentWorld {
    root: Option<TempDir>,
    env: Arc<Environment>,
    facts: Option<Arc<StubFacts>>,
    recorder: Option<Arc<FaultRecorder>>,
    homes: Vec<Outcome<PathBuf>>,
    changed: Option<Result<(), EnvError>>,
}

impl EnvironmentWorld {
    fn root(&self) -> PathBuf {
        self.root.as_ref().expect("root set").path().to_path_buf()
    }

    fn use_facts(&mut self, facts: StubFacts) {
        let facts = Arc::new(facts);
        self.env.set_facts(facts.clone());
        self.facts = Some(facts);
    }
}

#[given("an environment rooted in a fresh temporary directory")]
fn rooted_in_temporary_directory(world: &mut EnvironmentWorld) {
    let root = temp_root();
    world.env = Arc::new(Environment::new().with_root(root.path()));
    world.root = Some(root);
}

#[given("an environment whose home directory is reported only once")]
fn home_reported_once(world: &mut EnvironmentWorld) {
    let root = temp_root();
    world.use_facts(StubFacts::default().with_home(Answer::PathOnce(root.path().to_path_buf())));
    world.root = Some(root);
}

#[given("an environment whose home directory is unavailable")]
fn home_unavailable(world: &mut EnvironmentWorld) {
    world.use_facts(StubFacts::default().with_home(Answer::fail("no home in test")));
}

#[given("an environment fault handler that returns")]
fn returning_environment_handler(world: &mut EnvironmentWorld) {
    let recorder = FaultRecorder::returning();
    world.env.set_fault_handler(recorder.clone());
    world.recorder = Some(recorder);
}

#[given("directory changes are refused")]
fn directory_changes_refused(world: &mut EnvironmentWorld) {
    world.use_facts(StubFacts::default().failing_change_dir("refused in test"));
}

#[when(regex = r"^the home directory is requested (\d+) times$")]
fn request_home(world: &mut EnvironmentWorld, times: usize) {
    for _ in 0..times {
        let env = world.env.clone();
        world.homes.push(catch_unwind(AssertUnwindSafe(|| env.home())));
    }
}

#[when(regex = r#"^the working directory is changed to "(.+)"$"#)]
fn change_working_directory(world: &mut EnvironmentWorld, path: String) {
    world.changed = Some(world.env.change_working_directory(path));
}

#[then(regex = r#"^the config directory is "(.+)" below the root$"#)]
fn config_below_root(world: &mut EnvironmentWorld, suffix: String) {
    assert_eq!(world.env.config_directory(), world.root().join(suffix));
}

#[then(regex = r#"^the logging directory is "(.+)" below the config directory$"#)]
fn logging_below_config(world: &mut EnvironmentWorld, name: String) {
    assert_eq!(
        world.env.logging_directory(),
        world.env.config_directory().join(name)
    );
}

#[then("the environment is temporary")]
fn is_temporary(world: &mut EnvironmentWorld) {
    assert!(world.env.is_temporary());
}

#[then("the environment is not the user's environment")]
fn is_not_user(world: &mut EnvironmentWorld) {
    assert!(!world.env.is_user());
}

#[then("every request yields the same home directory")]
fn same_home(world: &mut EnvironmentWorld) {
    let expected = world.root();
    for outcome in &world.homes {
        assert_eq!(outcome.as_ref().expect("home resolved"), &expected);
    }
}

#[then("the home directory was looked up once")]
fn looked_up_once(world: &mut EnvironmentWorld) {
    let facts = world.facts.as_ref().expect("facts set");
    assert_eq!(facts.calls(Fact::Home), 1);
}

#[then("the request stops with a handler usage fault")]
fn stops_with_usage_fault(world: &mut EnvironmentWorld) {
    let outcome = world.homes.last().expect("home requested");
    assert!(matches!(fault_of(outcome), Some(Fault::HandlerReturned(_))));
}

#[then(regex = r#"^the fault handler saw "(.+)"$"#)]
fn handler_saw(world: &mut EnvironmentWorld, text: String) {
    let recorder = world.recorder.as_ref().expect("handler set");
    assert!(recorder.last().contains(&text), "{}", recorder.last());
}

#[then("changing the working directory fails")]
fn change_fails(world: &mut EnvironmentWorld) {
    match world.changed.take() {
        Some(Err(EnvError::ChangeDir { path, .. })) => assert_eq!(path, PathBuf::from("/srv/gini")),
        other => panic!("expected a refused change, got {other:?}"),
    }
    assert_ne!(world.env.working_directory(), PathBuf::from("/srv/gini"));
}
