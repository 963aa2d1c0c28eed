//! Recoverable environment errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors an environment reports to its caller instead of escalating.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Changing the working directory failed.
    #[error("gini: env: change working directory to {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Creating a directory and its missing ancestors failed.
    #[error("gini: env: create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EnvError {
    /// Path the failed operation targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::ChangeDir { path, .. } | Self::CreateDir { path, .. } => path,
        }
    }
}
