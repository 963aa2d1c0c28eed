//! Concurrency-safe access to a GINI instance's runtime environment.
//!
//! An [`Environment`] derives four locations from a handful of OS facts:
//! the home (root) directory, the working directory, the configuration
//! directory `<base>/gini/config` and the logging directory
//! `<config>/logs`. Each location is resolved on first use and cached for
//! the lifetime of the instance.
//!
//! The instance lock is never held while a [`FactProvider`] or
//! [`FaultHandler`] is called, nor while another resolving accessor runs.
//! Two threads resolving the same location concurrently may both consult
//! the provider; the first stored answer wins and both return it.

use gini_lib::{
    CONFIG_SUFFIX, EnvError, FactProvider, Fault, FaultHandler, LOGGING_DIR_NAME, OsFacts,
    escalate,
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct State {
    root: Option<PathBuf>,
    working_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    logging_dir: Option<PathBuf>,
    facts: Option<Arc<dyn FactProvider>>,
    fault_handler: Option<Arc<dyn FaultHandler>>,
}

/// Runtime environment of a GINI instance.
///
/// A default-constructed environment is ready to use: its root defaults to
/// the user's home directory and its facts to [`OsFacts`]. Overriding the
/// root, typically with a temporary directory, confines every derived
/// location to it, which keeps parallel tests isolated from each other and
/// from the user's configuration.
#[derive(Default)]
pub struct Environment {
    state: Mutex<State>,
    chdir: Mutex<()>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Environment")
            .field("root", &state.root)
            .field("working_dir", &state.working_dir)
            .field("config_dir", &state.config_dir)
            .field("logging_dir", &state.logging_dir)
            .field("custom_facts", &state.facts.is_some())
            .field("fault_handler", &state.fault_handler.is_some())
            .finish()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` as root instead of the user's home directory.
    #[must_use]
    pub fn with_root(self, path: impl Into<PathBuf>) -> Self {
        self.set_root(path);
        self
    }

    #[must_use]
    pub fn with_facts(self, facts: Arc<dyn FactProvider>) -> Self {
        self.set_facts(facts);
        self
    }

    #[must_use]
    pub fn with_fault_handler(self, handler: Arc<dyn FaultHandler>) -> Self {
        self.set_fault_handler(handler);
        self
    }

    /// Set the root directory. An empty path leaves the root unchanged.
    pub fn set_root(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return;
        }
        self.lock().root = Some(path);
    }

    /// Replace the provider consulted for facts not yet cached.
    pub fn set_facts(&self, facts: Arc<dyn FactProvider>) {
        self.lock().facts = Some(facts);
    }

    /// Replace the handler invoked when a required fact is unavailable.
    pub fn set_fault_handler(&self, handler: Arc<dyn FaultHandler>) {
        self.lock().fault_handler = Some(handler);
    }

    /// The configured fault handler, if any.
    pub fn fault_handler(&self) -> Option<Arc<dyn FaultHandler>> {
        self.lock().fault_handler.clone()
    }

    /// Home directory of this environment.
    ///
    /// Defaults to the user's home directory unless a root was set. Raises
    /// [`Fault::NoHome`] if it cannot be determined.
    pub fn home(&self) -> PathBuf {
        let cached = self.lock().root.clone();
        if let Some(root) = cached {
            return root;
        }
        let home = self
            .facts()
            .home_dir()
            .unwrap_or_else(|e| self.fault(Fault::NoHome(e)));
        let mut state = self.lock();
        let root = state.root.get_or_insert(home).clone();
        tracing::debug!(root = %root.display(), "resolved home directory");
        root
    }

    /// Current working directory, resolved on first call.
    ///
    /// Raises [`Fault::NoWorkingDir`] if it cannot be determined. Use
    /// [`Self::change_working_directory`] to change it.
    pub fn working_directory(&self) -> PathBuf {
        let cached = self.lock().working_dir.clone();
        if let Some(wd) = cached {
            return wd;
        }
        let wd = self
            .facts()
            .working_dir()
            .unwrap_or_else(|e| self.fault(Fault::NoWorkingDir(e)));
        self.lock().working_dir.get_or_insert(wd).clone()
    }

    /// Change the working directory of the environment and the process.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ChangeDir`] if the provider refuses the change;
    /// the cached working directory is left untouched in that case.
    pub fn change_working_directory(&self, path: impl AsRef<Path>) -> Result<(), EnvError> {
        let path = path.as_ref();
        let facts = self.facts();
        // Serializes the change with the cache update so the cached
        // directory is always the last one the provider moved to.
        let _chdir = self.chdir.lock().unwrap_or_else(PoisonError::into_inner);
        facts
            .change_dir(path)
            .map_err(|source| EnvError::ChangeDir {
                path: path.to_path_buf(),
                source,
            })?;
        self.lock().working_dir = Some(path.to_path_buf());
        Ok(())
    }

    /// Configuration directory `<base>/gini/config`.
    ///
    /// The base is the platform configuration directory for the user's own
    /// environment. It falls back to [`Self::home`] if the platform
    /// directory is unavailable or the root was overridden.
    pub fn config_directory(&self) -> PathBuf {
        let cached = self.lock().config_dir.clone();
        if let Some(conf) = cached {
            return conf;
        }
        let base = match self.facts().config_dir() {
            Ok(dir) if self.is_user() => dir,
            _ => self.home(),
        };
        let conf = CONFIG_SUFFIX.iter().fold(base, |p, c| p.join(c));
        let mut state = self.lock();
        let conf = state.config_dir.get_or_insert(conf).clone();
        tracing::debug!(config = %conf.display(), "resolved config directory");
        conf
    }

    /// Logging directory `<config>/logs`.
    pub fn logging_directory(&self) -> PathBuf {
        let cached = self.lock().logging_dir.clone();
        if let Some(logging) = cached {
            return logging;
        }
        let logging = self.config_directory().join(LOGGING_DIR_NAME);
        self.lock().logging_dir.get_or_insert(logging).clone()
    }

    /// Create the logging directory and its missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::CreateDir`] if the directory cannot be created.
    pub fn ensure_logging_directory(&self) -> Result<(), EnvError> {
        let path = self.logging_directory();
        self.facts()
            .create_dir_all(&path)
            .map_err(|source| EnvError::CreateDir { path, source })
    }

    /// Whether the home directory is the user's home directory.
    ///
    /// Raises [`Fault::NoHome`] if the user's home cannot be determined.
    pub fn is_user(&self) -> bool {
        let home = self.home();
        let user = self
            .facts()
            .home_dir()
            .unwrap_or_else(|e| self.fault(Fault::NoHome(e)));
        home == user
    }

    /// Whether the home directory lies below the platform temporary root.
    pub fn is_temporary(&self) -> bool {
        let home = self.home();
        home.starts_with(self.facts().temp_dir())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn facts(&self) -> Arc<dyn FactProvider> {
        self.lock()
            .facts
            .get_or_insert_with(|| Arc::new(OsFacts))
            .clone()
    }

    fn fault(&self, fault: Fault) -> ! {
        let handler = self.fault_handler();
        escalate(handler.as_deref(), fault)
    }
}
