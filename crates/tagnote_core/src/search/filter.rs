//! Derived note/tag views for list rendering.
//!
//! # Invariants
//! - Matching is case-insensitive substring containment.
//! - An empty term matches everything.
//! - Results keep snapshot insertion order.

use crate::model::note::Note;
use crate::model::snapshot::Snapshot;
use crate::model::id::TagId;
use crate::model::tag::Tag;

/// Note list filter: text term plus optional exact tag match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Matched against `Note::text` only.
    pub term: String,
    /// `None` disables tag filtering; untagged notes never match `Some`.
    pub tag_id: Option<TagId>,
}

impl NoteFilter {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            tag_id: None,
        }
    }

    pub fn with_tag(mut self, tag_id: Option<TagId>) -> Self {
        self.tag_id = tag_id;
        self
    }

    /// Whether `note` passes both the term and tag predicates.
    pub fn matches(&self, note: &Note) -> bool {
        let tag_ok = self.tag_id.is_none() || note.tag_id == self.tag_id;
        tag_ok && contains_ignore_case(&note.text, &self.term)
    }
}

/// Notes passing `filter`, in insertion order.
pub fn filter_notes<'a>(snapshot: &'a Snapshot, filter: &NoteFilter) -> Vec<&'a Note> {
    snapshot
        .notes
        .iter()
        .filter(|note| filter.matches(note))
        .collect()
}

/// Tags whose name contains `term`, in insertion order.
pub fn filter_tags<'a>(snapshot: &'a Snapshot, term: &str) -> Vec<&'a Tag> {
    snapshot
        .tags
        .iter()
        .filter(|tag| contains_ignore_case(&tag.name, term))
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
