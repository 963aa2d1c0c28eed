//! Registry of named log channels.
//!
//! All registry mutations and all channel writes go through one lock per
//! [`Logger`]. The lock is never held while the [`Environment`], its fact
//! provider or a fault handler runs, so any of them may write to the same
//! logger or unwind.

use crate::FILE_SUFFIX;
use crate::channel::Channel;
use crate::io::{FsIo, LogIo, OpenMode};
use crate::profile::Profile;
use chrono::Utc;
use gini_env::Environment;
use gini_env::config::Settings;
use gini_lib::{ChannelStep, Fault, FaultHandler, escalate};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::io;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct State {
    channels: HashMap<String, Channel>,
    persist_temporary: bool,
    fault_handler: Option<Arc<dyn FaultHandler>>,
    io: Arc<dyn LogIo>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
            persist_temporary: false,
            fault_handler: None,
            io: Arc::new(FsIo),
        }
    }
}

enum Backing {
    Memory,
    File(PathBuf),
}

/// Named log channels of a GINI instance.
///
/// A logger built with [`Logger::new`] creates a channel the first time a
/// name is written to. A detached logger (see [`Logger::default`]) has no
/// environment: it forwards messages to `tracing` and never holds content.
#[derive(Default)]
pub struct Logger {
    environment: Option<Arc<Environment>>,
    state: Mutex<State>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        let mut names: Vec<&str> = state.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Logger")
            .field("environment", &self.environment)
            .field("channels", &names)
            .field("persist_temporary", &state.persist_temporary)
            .field("fault_handler", &state.fault_handler.is_some())
            .finish()
    }
}

impl Logger {
    /// Logger writing channels according to `environment`.
    pub fn new(environment: Arc<Environment>) -> Self {
        Self {
            environment: Some(environment),
            state: Mutex::default(),
        }
    }

    /// Logger for `environment` with the persistence policy of `settings`.
    pub fn from_settings(settings: &Settings, environment: Arc<Environment>) -> Self {
        Self::new(environment).with_persist_temporary(settings.persist_temporary_logs)
    }

    /// Back channels with files even when the environment is temporary.
    #[must_use]
    pub fn with_persist_temporary(self, persist: bool) -> Self {
        self.set_persist_temporary(persist);
        self
    }

    #[must_use]
    pub fn with_fault_handler(self, handler: Arc<dyn FaultHandler>) -> Self {
        self.set_fault_handler(handler);
        self
    }

    #[must_use]
    pub fn with_io(self, io: Arc<dyn LogIo>) -> Self {
        self.set_io(io);
        self
    }

    /// Only affects channels created afterwards.
    pub fn set_persist_temporary(&self, persist: bool) {
        self.lock().persist_temporary = persist;
    }

    pub fn set_fault_handler(&self, handler: Arc<dyn FaultHandler>) {
        self.lock().fault_handler = Some(handler);
    }

    pub fn set_io(&self, io: Arc<dyn LogIo>) {
        self.lock().io = io;
    }

    pub fn environment(&self) -> Option<&Arc<Environment>> {
        self.environment.as_ref()
    }

    /// Handler invoked on faults: the logger's own, otherwise the
    /// environment's.
    pub fn fault_handler(&self) -> Option<Arc<dyn FaultHandler>> {
        let own = self.lock().fault_handler.clone();
        own.or_else(|| self.environment.as_ref().and_then(|env| env.fault_handler()))
    }

    /// Append `message` to the channel `name`, creating the channel first
    /// if needed.
    ///
    /// Formatted messages can be passed with [`format_args!`]. Failing to
    /// create or write the channel raises a [`Fault`].
    #[track_caller]
    pub fn write(&self, name: &str, message: impl fmt::Display) {
        let caller = Location::caller();
        let Some(env) = &self.environment else {
            tracing::info!(channel = name, "{message}");
            return;
        };
        if let Err(fault) = self.append(env, name, &message.to_string(), caller) {
            self.fault(fault);
        }
    }

    /// Everything written to `name` so far.
    ///
    /// A file-backed channel is closed, read back and reopened for
    /// appending. Unknown channels read as empty. Failing any step of the
    /// read raises a [`Fault`].
    pub fn read(&self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }
        let result = {
            let mut state = self.lock();
            let State { channels, io, .. } = &mut *state;
            match channels.get_mut(name) {
                Some(channel) => channel.checkpoint(io.as_ref()),
                None => return String::new(),
            }
        };
        result.unwrap_or_else(|fault| self.fault(fault))
    }

    /// Whether `name` exists and is kept in memory.
    pub fn is_in_memory(&self, name: &str) -> bool {
        self.lock()
            .channels
            .get(name)
            .is_some_and(Channel::is_in_memory)
    }

    /// Formatting profile of `name`, if the channel exists.
    pub fn profile(&self, name: &str) -> Option<Profile> {
        self.lock().channels.get(name).map(Channel::profile)
    }

    /// Raise `message` as a fault through the configured handler.
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.fault(Fault::Message(message.to_string()))
    }

    fn append(
        &self,
        env: &Environment,
        name: &str,
        message: &str,
        caller: &Location<'_>,
    ) -> Result<(), Fault> {
        if let Some(result) = self.append_existing(name, message, caller) {
            return result;
        }
        let backing = self.backing(env, name);
        match self.create_and_append(name, message, caller, &backing) {
            Err(CreateError::Open(path, e)) => {
                tracing::debug!(path = %path.display(), error = %e, "creating logging directory");
                env.ensure_logging_directory().map_err(Fault::CreateLogDir)?;
                self.create_and_append(name, message, caller, &backing)
                    .map_err(Fault::from)
            }
            other => other.map_err(Fault::from),
        }
    }

    fn append_existing(
        &self,
        name: &str,
        message: &str,
        caller: &Location<'_>,
    ) -> Option<Result<(), Fault>> {
        let mut state = self.lock();
        let channel = state.channels.get_mut(name)?;
        Some(append_record(channel, caller, name, message))
    }

    /// Append to `name`, creating it on `backing` unless another writer
    /// created it since the registry was last checked.
    fn create_and_append(
        &self,
        name: &str,
        message: &str,
        caller: &Location<'_>,
        backing: &Backing,
    ) -> Result<(), CreateError> {
        let mut state = self.lock();
        let State { channels, io, .. } = &mut *state;
        let channel = match channels.entry(name.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(open(io.as_ref(), name, backing)?),
        };
        append_record(channel, caller, name, message).map_err(CreateError::from)
    }

    /// Resolve where a new channel lives. Runs without the lock held since
    /// the environment may consult its fact provider or fault handler.
    fn backing(&self, env: &Environment, name: &str) -> Backing {
        let persist = self.lock().persist_temporary;
        if env.is_temporary() && !persist {
            Backing::Memory
        } else {
            Backing::File(log_path(env, name))
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fault(&self, fault: Fault) -> ! {
        let handler = self.fault_handler();
        escalate(handler.as_deref(), fault)
    }
}

fn log_path(env: &Environment, name: &str) -> PathBuf {
    env.logging_directory().join(format!("{name}.{FILE_SUFFIX}"))
}

/// Failure to create a channel. A failed open is retried once the logging
/// directory exists.
enum CreateError {
    Open(PathBuf, io::Error),
    Fault(Fault),
}

impl From<Fault> for CreateError {
    fn from(fault: Fault) -> Self {
        Self::Fault(fault)
    }
}

impl From<CreateError> for Fault {
    fn from(err: CreateError) -> Self {
        match err {
            CreateError::Open(path, e) => Self::channel(ChannelStep::Open, path, e),
            CreateError::Fault(fault) => fault,
        }
    }
}

fn open(io: &dyn LogIo, name: &str, backing: &Backing) -> Result<Channel, CreateError> {
    let profile = Profile::for_channel(name);
    match backing {
        Backing::Memory => {
            tracing::debug!(channel = name, "created in-memory log channel");
            Ok(Channel::in_memory(profile))
        }
        Backing::File(path) => {
            let file = io
                .open(path, OpenMode::Truncate)
                .map_err(|e| CreateError::Open(path.clone(), e))?;
            tracing::debug!(channel = name, path = %path.display(), "created file-backed log channel");
            Ok(Channel::on_file(profile, path.clone(), file))
        }
    }
}

fn append_record(
    channel: &mut Channel,
    caller: &Location<'_>,
    name: &str,
    message: &str,
) -> Result<(), Fault> {
    let record = channel.profile().format(Utc::now(), caller, name, message);
    channel.append(&record)
}
