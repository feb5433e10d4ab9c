//! Domain model for notes, tags and the combined snapshot.
//!
//! # Responsibility
//! - Define the data structures every other layer passes around.
//! - Own the wire shape used for persistence.
//!
//! # Invariants
//! - Every note and tag is identified by a stable opaque string id.
//! - Deletion is a hard removal from the snapshot.

pub mod id;
pub mod note;
pub mod snapshot;
pub mod tag;
