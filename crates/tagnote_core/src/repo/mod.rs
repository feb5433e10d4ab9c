//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value blob contract used by the persistence adapter.
//! - Isolate SQLite query details from coordinator orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport errors; swallowing them is the
//!   persistence adapter's decision, not the repository's.

pub mod kv_repo;
