//! Startup wiring from config to a ready coordinator.
//!
//! # Responsibility
//! - Validate config, start logging, open storage, seed state.
//!
//! # Invariants
//! - Storage and config failures are fatal here; a stored blob that cannot
//!   be decoded is not (it reads as empty state).

use crate::config::{ConfigError, CoreConfig};
use crate::logging::{init_logging, LoggingError};
use crate::persistence::PersistenceAdapter;
use crate::repo::kv_repo::{RepoError, SqliteKeyValueRepository};
use crate::service::coordinator::Coordinator;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Startup failure.
#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Logging(LoggingError),
    Storage(RepoError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage unavailable: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for BootstrapError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<RepoError> for BootstrapError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Opens the coordinator described by `config`, persisting to SQLite.
pub fn open_coordinator(config: CoreConfig) -> Result<Coordinator, BootstrapError> {
    let config = config.validate()?;
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let repo = match config.db_path.as_deref() {
        Some(path) => SqliteKeyValueRepository::open(path)?,
        None => SqliteKeyValueRepository::open_in_memory()?,
    };
    let coordinator = Coordinator::open(PersistenceAdapter::with_key(repo, config.storage_key));
    info!(
        "event=core_open module=bootstrap status=ok notes={} tags={}",
        coordinator.note_count(),
        coordinator.tag_count()
    );
    Ok(coordinator)
}
