//! OS facts an environment is derived from.
//!
//! Every operation that may fail on a real system goes through
//! [`FactProvider`], so tests can substitute deterministic answers.

use std::io;
use std::path::{Path, PathBuf};

/// Capability set answering OS-level environment queries.
pub trait FactProvider: Send + Sync {
    /// The user's home directory.
    fn home_dir(&self) -> io::Result<PathBuf>;

    /// The process's current working directory.
    fn working_dir(&self) -> io::Result<PathBuf>;

    /// The platform's user configuration directory.
    fn config_dir(&self) -> io::Result<PathBuf>;

    /// Change the process's working directory.
    fn change_dir(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and all of its missing ancestors.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Root of the platform's temporary storage.
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

/// [`FactProvider`] backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFacts;

fn unavailable(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{what} is unavailable"))
}

impl FactProvider for OsFacts {
    fn home_dir(&self) -> io::Result<PathBuf> {
        dirs::home_dir().ok_or_else(|| unavailable("home directory"))
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> io::Result<PathBuf> {
        dirs::config_dir().ok_or_else(|| unavailable("user config directory"))
    }

    fn change_dir(&self, path: &Path) -> io::Result<()> {
        std::env::set_current_dir(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(path)
    }
}
