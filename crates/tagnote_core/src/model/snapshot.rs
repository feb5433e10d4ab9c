//! Application snapshot: the unit of state and persistence.
//!
//! # Responsibility
//! - Hold the ordered note and tag collections together.
//! - Provide read-only lookups and reference-count auditing.
//!
//! # Invariants
//! - Collection order is insertion order.
//! - Serialized shape is `{"notes": [...], "tags": [...]}`.

use crate::model::id::{NoteId, TagId};
use crate::model::note::Note;
use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};

/// Complete (notes, tags) state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Tag whose stored count differs from the notes that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch {
    pub tag_id: TagId,
    pub stored: u32,
    pub actual: usize,
}

impl Snapshot {
    pub fn new(notes: Vec<Note>, tags: Vec<Tag>) -> Self {
        Self { notes, tags }
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|tag| &tag.id == id)
    }

    /// Number of notes currently pointing at `tag_id`.
    pub fn references_to(&self, tag_id: &TagId) -> usize {
        self.notes
            .iter()
            .filter(|note| note.tag_id.as_ref() == Some(tag_id))
            .count()
    }

    /// Lists every tag whose `count` disagrees with actual note references.
    ///
    /// Empty for any snapshot produced by the coordinator from a consistent
    /// starting point.
    pub fn count_mismatches(&self) -> Vec<CountMismatch> {
        self.tags
            .iter()
            .filter_map(|tag| {
                let actual = self.references_to(&tag.id);
                if usize::try_from(tag.count).ok() == Some(actual) {
                    None
                } else {
                    Some(CountMismatch {
                        tag_id: tag.id.clone(),
                        stored: tag.count,
                        actual,
                    })
                }
            })
            .collect()
    }

    pub fn is_consistent(&self) -> bool {
        self.count_mismatches().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::note::{Note, NoteInput};
    use crate::model::tag::Tag;

    #[test]
    fn count_mismatches_reports_stale_counts() {
        let mut tag = Tag::new("work");
        let note = Note::new(NoteInput::new("a").with_tag(Some(tag.id.clone())));
        let snapshot = Snapshot::new(vec![note.clone()], vec![tag.clone()]);
        let mismatches = snapshot.count_mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].stored, 0);
        assert_eq!(mismatches[0].actual, 1);

        tag.count = 1;
        let fixed = Snapshot::new(vec![note], vec![tag]);
        assert!(fixed.is_consistent());
    }

    #[test]
    fn missing_collections_deserialize_as_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }
}
