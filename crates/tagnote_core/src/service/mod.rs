//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store mutations into user-level actions.
//! - Keep view layers decoupled from store and storage details.

pub mod bootstrap;
pub mod coordinator;
