//! Runtime configuration for opening the core.
//!
//! # Responsibility
//! - Collect storage location, storage key and logging settings.
//! - Read overrides from `TAGNOTE_*` environment variables.
//!
//! # Invariants
//! - A validated config has a non-blank storage key, a known log level and
//!   absolute paths.
//! - `db_path = None` means an in-memory database.

use crate::logging::{default_log_level, normalize_level};
use crate::persistence::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "TAGNOTE_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "TAGNOTE_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "TAGNOTE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TAGNOTE_LOG_DIR";

/// Config validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BlankStorageKey,
    UnsupportedLogLevel(String),
    RelativePath { field: &'static str, path: PathBuf },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankStorageKey => write!(f, "storage_key must not be blank"),
            Self::UnsupportedLogLevel(level) => write!(f, "unsupported log level `{level}`"),
            Self::RelativePath { field, path } => {
                write!(f, "{field} must be an absolute path, got `{}`", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings used by [`crate::open_coordinator`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file backing the key-value store.
    pub db_path: Option<PathBuf>,
    /// Key the snapshot blob is stored under.
    pub storage_key: String,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Defaults overridden by any `TAGNOTE_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`CoreConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            db_path: non_blank(ENV_DB_PATH).map(PathBuf::from),
            storage_key: non_blank(ENV_STORAGE_KEY).unwrap_or(defaults.storage_key),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Checks the config and returns it with the log level normalized.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        self.storage_key = self.storage_key.trim().to_string();
        self.log_level = normalize_level(&self.log_level)
            .map_err(|_| ConfigError::UnsupportedLogLevel(self.log_level.clone()))?
            .to_string();
        if let Some(path) = self.db_path.as_deref() {
            require_absolute("db_path", path)?;
        }
        if let Some(path) = self.log_dir.as_deref() {
            require_absolute("log_dir", path)?;
        }
        Ok(self)
    }
}

fn require_absolute(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(ConfigError::RelativePath {
            field,
            path: path.to_path_buf(),
        })
    }
}
