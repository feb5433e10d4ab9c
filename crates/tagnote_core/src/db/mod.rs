//! SQLite connections for the key-value table.
//!
//! # Invariants
//! - A connection is handed out only after its schema is current.
//! - Failures surface as [`crate::RepoError`]; this layer has no error type
//!   of its own.

mod open;
mod schema;

pub(crate) use open::{open_file, open_memory};
