//! Search and filtering over in-memory snapshots.
//!
//! # Responsibility
//! - Derive filtered note/tag lists for display.
//!
//! # Invariants
//! - Filtering is read-only and never mutates the snapshot.

pub mod filter;
