//! Core domain logic for tagnote.
//! This crate is the single source of truth for note/tag invariants.

pub mod config;
mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod search;
pub mod service;
mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id::{NoteId, TagId};
pub use model::note::{Note, NoteInput};
pub use model::snapshot::{CountMismatch, Snapshot};
pub use model::tag::Tag;
pub use persistence::{PersistenceAdapter, DEFAULT_STORAGE_KEY};
pub use repo::kv_repo::{
    KeyValueRepository, MemoryKeyValueRepository, RepoError, RepoResult,
    SqliteKeyValueRepository,
};
pub use search::filter::NoteFilter;
pub use service::bootstrap::{open_coordinator, BootstrapError};
pub use service::coordinator::{
    Coordinator, CoordinatorError, CoordinatorResult, ListenerId, SnapshotChange, StateAction,
    TAG_IN_USE_MESSAGE, TAG_NOT_FOUND_MESSAGE,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
