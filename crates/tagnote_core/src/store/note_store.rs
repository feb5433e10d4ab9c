//! Ordered note collection operations.

use crate::model::id::{NoteId, TagId};
use crate::model::note::{Note, NoteInput};

/// Mutable view over the note collection of a working snapshot.
pub(crate) struct NoteStore<'snap> {
    notes: &'snap mut Vec<Note>,
}

impl<'snap> NoteStore<'snap> {
    pub(crate) fn new(notes: &'snap mut Vec<Note>) -> Self {
        Self { notes }
    }

    /// Appends a new note and returns a copy of it.
    pub(crate) fn create(&mut self, input: NoteInput) -> Note {
        let note = Note::new(input);
        self.notes.push(note.clone());
        note
    }

    /// Replaces mutable fields of `id`. Returns the updated note, or `None`
    /// when no such note exists.
    pub(crate) fn update(&mut self, id: &NoteId, input: NoteInput) -> Option<Note> {
        let note = self.notes.iter_mut().find(|note| &note.id == id)?;
        note.apply(input);
        Some(note.clone())
    }

    /// Removes `id` and returns it, or `None` when absent.
    pub(crate) fn delete(&mut self, id: &NoteId) -> Option<Note> {
        let index = self.notes.iter().position(|note| &note.id == id)?;
        Some(self.notes.remove(index))
    }

    /// Clears `tag_id` on every note referencing it. Returns how many notes
    /// were touched.
    pub(crate) fn detach_tag(&mut self, tag_id: &TagId) -> usize {
        let mut detached = 0;
        for note in self.notes.iter_mut() {
            if note.tag_id.as_ref() == Some(tag_id) {
                note.tag_id = None;
                detached += 1;
            }
        }
        detached
    }
}
