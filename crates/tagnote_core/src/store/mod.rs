//! Single-entity stores over a working copy of the snapshot.
//!
//! # Responsibility
//! - Apply one-collection mutations (notes or tags) in place.
//! - Treat an unknown target id as a silent no-op.
//!
//! # Invariants
//! - Stores never touch the other collection; cross-entity consistency is
//!   the coordinator's job.
//! - Stores are crate-private so no caller can bypass the coordinator.

pub(crate) mod note_store;
pub(crate) mod tag_store;
