//! Deterministic [`FactProvider`] for tests.
//!
//! Each fact can be answered by the operating system, by a fixed path, or
//! by a failure. Directory changes are recorded but never applied to the
//! test process, since the working directory is process-global.

use gini_lib::{FactProvider, OsFacts};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Facts a [`StubFacts`] counts calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fact {
    Home,
    WorkingDir,
    ConfigDir,
    ChangeDir,
    CreateDir,
}

/// How a stubbed fact is answered.
#[derive(Debug, Clone, Default)]
pub enum Answer {
    /// Delegate to the operating system.
    #[default]
    Os,
    /// Always answer with the given path.
    Path(PathBuf),
    /// Answer with the given path once, then fail.
    PathOnce(PathBuf),
    /// Always fail with the given message.
    Fail(String),
}

impl Answer {
    pub fn fail(msg: &str) -> Self {
        Self::Fail(msg.to_owned())
    }

    fn resolve(&self, calls: usize, os: impl FnOnce() -> io::Result<PathBuf>) -> io::Result<PathBuf> {
        match self {
            Self::Os => os(),
            Self::Path(p) => Ok(p.clone()),
            Self::PathOnce(p) if calls == 1 => Ok(p.clone()),
            Self::PathOnce(_) => Err(io::Error::other("stubbed fact already answered")),
            Self::Fail(msg) => Err(io::Error::other(msg.clone())),
        }
    }
}

/// Configurable [`FactProvider`] recording how often each fact is consulted.
#[derive(Debug, Default)]
pub struct StubFacts {
    home: Answer,
    working: Answer,
    config: Answer,
    change_dir: Option<String>,
    create_dir: Option<String>,
    temp: Option<PathBuf>,
    calls: Mutex<HashMap<Fact, usize>>,
    changed_to: Mutex<Vec<PathBuf>>,
}

impl StubFacts {
    #[must_use]
    pub fn with_home(mut self, answer: Answer) -> Self {
        self.home = answer;
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, answer: Answer) -> Self {
        self.working = answer;
        self
    }

    #[must_use]
    pub fn with_config_dir(mut self, answer: Answer) -> Self {
        self.config = answer;
        self
    }

    /// Make directory changes fail with `msg`.
    #[must_use]
    pub fn failing_change_dir(mut self, msg: &str) -> Self {
        self.change_dir = Some(msg.to_owned());
        self
    }

    /// Make directory creation fail with `msg`.
    #[must_use]
    pub fn failing_create_dir(mut self, msg: &str) -> Self {
        self.create_dir = Some(msg.to_owned());
        self
    }

    /// Report `path` as the platform temporary root.
    #[must_use]
    pub fn with_temp_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.temp = Some(path.into());
        self
    }

    /// Number of times `fact` has been consulted.
    pub fn calls(&self, fact: Fact) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&fact)
            .copied()
            .unwrap_or_default()
    }

    /// Directories successfully "changed" into, in call order.
    pub fn changed_to(&self) -> Vec<PathBuf> {
        self.changed_to
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn count(&self, fact: Fact) -> usize {
        let mut calls = self
            .calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let n = calls.entry(fact).or_default();
        *n += 1;
        *n
    }
}

impl FactProvider for StubFacts {
    fn home_dir(&self) -> io::Result<PathBuf> {
        let n = self.count(Fact::Home);
        self.home.resolve(n, || OsFacts.home_dir())
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        let n = self.count(Fact::WorkingDir);
        self.working.resolve(n, || OsFacts.working_dir())
    }

    fn config_dir(&self) -> io::Result<PathBuf> {
        let n = self.count(Fact::ConfigDir);
        self.config.resolve(n, || OsFacts.config_dir())
    }

    fn change_dir(&self, path: &Path) -> io::Result<()> {
        self.count(Fact::ChangeDir);
        if let Some(msg) = &self.change_dir {
            return Err(io::Error::other(msg.clone()));
        }
        self.changed_to
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.count(Fact::CreateDir);
        match &self.create_dir {
            Some(msg) => Err(io::Error::other(msg.clone())),
            None => OsFacts.create_dir_all(path),
        }
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp.clone().unwrap_or_else(std::env::temp_dir)
    }
}
