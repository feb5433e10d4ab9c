//! Note domain model.
//!
//! # Responsibility
//! - Define the note record shared by stores, filters and persistence.
//! - Produce ISO-8601 timestamps for `created` / `updated`.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `created` is written once; `updated` is refreshed on every edit.
//! - `tag_id` is a plain reference, not a foreign key.

use crate::model::id::{NoteId, TagId};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One short text note, optionally tagged with a single tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    /// `None` means untagged.
    pub tag_id: Option<TagId>,
    pub title: Option<String>,
    pub text: String,
    /// ISO-8601 UTC, millisecond precision.
    pub created: String,
    /// ISO-8601 UTC, millisecond precision.
    pub updated: String,
}

impl Note {
    /// Creates a note with a generated id and both timestamps set to now.
    pub fn new(input: NoteInput) -> Self {
        let now = timestamp_now();
        Self {
            id: NoteId::generate(),
            tag_id: input.tag_id,
            title: input.title,
            text: input.text,
            created: now.clone(),
            updated: now,
        }
    }

    /// Replaces every mutable field and refreshes `updated`.
    pub fn apply(&mut self, input: NoteInput) {
        self.text = input.text;
        self.title = input.title;
        self.tag_id = input.tag_id;
        self.updated = timestamp_now();
    }
}

/// Mutable note fields as submitted by a create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub text: String,
    pub title: Option<String>,
    pub tag_id: Option<TagId>,
}

impl NoteInput {
    /// Untitled, untagged input.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_tag(mut self, tag_id: Option<TagId>) -> Self {
        self.tag_id = tag_id;
        self
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
