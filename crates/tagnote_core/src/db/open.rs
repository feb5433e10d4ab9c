//! File and in-memory connection opening.

use super::schema::upgrade;
use crate::repo::kv_repo::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) a database file with a current schema.
pub(crate) fn open_file(path: &Path) -> RepoResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory database with a current schema.
pub(crate) fn open_memory() -> RepoResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> RepoResult<Connection> {
    let started_at = Instant::now();
    let opened = connect()
        .map_err(RepoError::from)
        .and_then(|mut conn| -> RepoResult<Connection> {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            upgrade(&mut conn)?;
            Ok(conn)
        });

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    opened
}
