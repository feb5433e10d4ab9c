//! Key-value blob repository contracts and implementations.
//!
//! # Responsibility
//! - Provide an opaque get/set-blob interface keyed by string.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Keys are trimmed and must not be blank.
//! - `set_blob` overwrites any previous value for the key.
//! - Values are stored verbatim; no parsing happens at this layer.

use crate::db::{open_file, open_memory};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Key-value storage failure.
#[derive(Debug)]
pub enum RepoError {
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "kv_store schema version {found} is newer than supported {supported}"
            ),
            Self::InvalidKey(key) => write!(f, "invalid storage key: `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::InvalidKey(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opaque blob storage keyed by string.
pub trait KeyValueRepository {
    /// Returns the stored blob, or `None` when nothing is stored under `key`.
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous blob.
    fn set_blob(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed key-value repository over the `kv_store` table.
pub struct SqliteKeyValueRepository {
    conn: Connection,
}

impl SqliteKeyValueRepository {
    /// Opens (or creates) a database file and brings its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self {
            conn: open_file(path.as_ref())?,
        })
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            conn: open_memory()?,
        })
    }

    /// Unix milliseconds of the last write to `key`.
    pub fn updated_at(&self, key: &str) -> RepoResult<Option<i64>> {
        let key = normalize_key(key)?;
        let stamp = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(stamp)
    }
}

impl KeyValueRepository for SqliteKeyValueRepository {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

/// In-process key-value repository.
///
/// Clones share the same map, so a caller can keep a handle for inspection
/// after moving one into a persistence adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueRepository {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryKeyValueRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueRepository for MemoryKeyValueRepository {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
