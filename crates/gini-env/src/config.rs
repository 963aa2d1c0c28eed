//! Settings for a GINI instance's environment.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables using the `GINI_` prefix (`GINI_ROOT`,
//! `GINI_PERSIST_TEMPORARY_LOGS`).

use crate::Environment;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested settings file does not exist.
    #[error("settings file not found: {}", .0.display())]
    Missing(PathBuf),
    /// The layered sources could not be merged into [`Settings`].
    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),
}

/// Environment and logging settings.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct Settings {
    /// Root replacing the user's home directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Write file-backed logs even when the root is temporary.
    #[serde(default)]
    pub persist_temporary_logs: bool,
}

impl Settings {
    /// Prefix of environment variables overriding settings.
    pub const ENV_PREFIX: &'static str = "GINI_";

    /// Load settings from defaults and `GINI_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a variable has an invalid value.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::defaults())
    }

    /// Load settings from the TOML file at `path`, with `GINI_*`
    /// environment variables taking precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `path` is not a file and
    /// [`ConfigError::Figment`] if the file or a variable is invalid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Self::extract(Self::defaults().merge(Toml::file(path)))
    }

    /// Build an [`Environment`] rooted according to these settings.
    pub fn environment(&self) -> Environment {
        let env = Environment::new();
        if let Some(root) = &self.root {
            env.set_root(root);
        }
        env
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(fig: Figment) -> Result<Self, ConfigError> {
        fig.merge(Env::prefixed(Self::ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }
}
