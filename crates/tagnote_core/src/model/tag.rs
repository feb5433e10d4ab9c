//! Tag domain model.
//!
//! # Invariants
//! - `count` equals the number of notes whose `tag_id` is this tag's `id`,
//!   as long as every mutation goes through the coordinator.
//! - Names are free-form and may repeat.

use crate::model::id::TagId;
use serde::{Deserialize, Serialize};

/// A named label with a reference count of notes using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub count: u32,
}

impl Tag {
    /// Creates an unused tag with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TagId::generate(),
            name: name.into(),
            count: 0,
        }
    }

    /// Whether any note still references this tag.
    pub fn is_in_use(&self) -> bool {
        self.count > 0
    }
}
