//! Step-wise schema upgrades tracked by `PRAGMA user_version`.
//!
//! # Invariants
//! - `user_version` equals the number of steps applied.
//! - Each step commits on its own; a failing step leaves the previous
//!   version in place.

use crate::repo::kv_repo::{RepoError, RepoResult};
use log::info;
use rusqlite::Connection;

/// Upgrade steps; step `n` (1-based) brings the schema to version `n`.
const STEPS: &[&str] = &[include_str!("sql/0001_kv_store.sql")];

/// Schema version written by this build.
pub(crate) const SCHEMA_VERSION: u32 = STEPS.len() as u32;

/// Brings `conn` up to [`SCHEMA_VERSION`].
pub(crate) fn upgrade(conn: &mut Connection) -> RepoResult<()> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(RepoError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    for (version, sql) in (1..=SCHEMA_VERSION).zip(STEPS).skip(found as usize) {
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!("event=db_upgrade module=db status=ok version={version}");
    }
    Ok(())
}
