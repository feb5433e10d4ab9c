//! Coordinator: the single mutation entry point for notes and tags.
//!
//! # Responsibility
//! - Sequence compound note/tag mutations so tag counts stay in step with
//!   note references.
//! - Publish each new snapshot to subscribers (persistence, views).
//! - Derive filtered note/tag lists from the latest snapshot.
//!
//! # Invariants
//! - Every transition works on a private copy and swaps in a complete new
//!   snapshot; a held `Arc<Snapshot>` is never mutated.
//! - `version` grows by exactly one per applied transition; no-ops and
//!   rejections leave it unchanged and notify nobody.
//! - For every tag, `count` equals the number of notes referencing it,
//!   provided the starting snapshot was consistent.

use crate::model::id::{NoteId, TagId};
use crate::model::note::{Note, NoteInput};
use crate::model::snapshot::Snapshot;
use crate::model::tag::Tag;
use crate::persistence::PersistenceAdapter;
use crate::repo::kv_repo::KeyValueRepository;
use crate::search::filter::{filter_notes, filter_tags, NoteFilter};
use crate::store::note_store::NoteStore;
use crate::store::tag_store::{TagRemoval, TagStore};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// User-facing text shown when a tag delete is refused.
pub const TAG_IN_USE_MESSAGE: &str = "Can't delete tag with associated notes.";
/// User-facing text shown when the tag to delete no longer exists.
pub const TAG_NOT_FOUND_MESSAGE: &str = "Tag no longer exists.";

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;

/// Business-rule rejections raised by coordinator transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// Tag still has notes pointing at it.
    TagInUse { tag_id: TagId, count: u32 },
    /// Target tag does not exist.
    TagNotFound(TagId),
}

impl CoordinatorError {
    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TagInUse { .. } => TAG_IN_USE_MESSAGE,
            Self::TagNotFound(_) => TAG_NOT_FOUND_MESSAGE,
        }
    }
}

impl Display for CoordinatorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TagInUse { tag_id, count } => {
                write!(f, "tag {tag_id} is still used by {count} note(s)")
            }
            Self::TagNotFound(tag_id) => write!(f, "tag not found: {tag_id}"),
        }
    }
}

impl Error for CoordinatorError {}

/// Which transition produced a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateAction {
    NoteAdded(NoteId),
    NoteEdited(NoteId),
    NoteDeleted(NoteId),
    TagAdded(TagId),
    TagRenamed(TagId),
    TagDeleted(TagId),
}

impl StateAction {
    /// Stable event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoteAdded(_) => "note_add",
            Self::NoteEdited(_) => "note_edit",
            Self::NoteDeleted(_) => "note_delete",
            Self::TagAdded(_) => "tag_add",
            Self::TagRenamed(_) => "tag_rename",
            Self::TagDeleted(_) => "tag_delete",
        }
    }
}

/// Notification delivered to subscribers after each applied transition.
#[derive(Debug, Clone)]
pub struct SnapshotChange {
    pub version: u64,
    pub action: StateAction,
    pub snapshot: Arc<Snapshot>,
}

/// Handle returned by [`Coordinator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type SnapshotListener = Box<dyn FnMut(&SnapshotChange)>;

/// Owns the application snapshot and exposes only transition functions.
pub struct Coordinator {
    snapshot: Arc<Snapshot>,
    version: u64,
    listeners: Vec<(ListenerId, SnapshotListener)>,
    next_listener_id: u64,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::with_snapshot(Snapshot::default())
    }
}

impl Coordinator {
    /// Starts from an empty snapshot with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `snapshot` (typically one loaded at startup).
    ///
    /// Stale tag counts in the seed are reported but kept as-is.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        for mismatch in snapshot.count_mismatches() {
            warn!(
                "event=state_seed module=coordinator status=inconsistent tag_id={} stored={} actual={}",
                mismatch.tag_id, mismatch.stored, mismatch.actual
            );
        }
        info!(
            "event=state_seed module=coordinator status=ok notes={} tags={}",
            snapshot.notes.len(),
            snapshot.tags.len()
        );
        Self {
            snapshot: Arc::new(snapshot),
            version: 0,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Seeds state from `persistence` and saves every later snapshot to it.
    pub fn open<R: KeyValueRepository + 'static>(persistence: PersistenceAdapter<R>) -> Self {
        let seed = persistence.load().unwrap_or_default();
        let mut coordinator = Self::with_snapshot(seed);
        coordinator.subscribe(move |change| persistence.save(&change.snapshot));
        coordinator
    }

    /// Registers `listener` for every future applied transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&SnapshotChange) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Latest snapshot; the returned handle never changes underneath the caller.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Number of transitions applied since construction.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Creates a note and bumps its tag's count.
    pub fn add_note(&mut self, input: NoteInput) -> Note {
        self.transition(|snap| {
            let tag_id = input.tag_id.clone();
            let note = NoteStore::new(&mut snap.notes).create(input);
            if let Some(tag_id) = &tag_id {
                TagStore::new(&mut snap.tags).increment_count(tag_id);
            }
            let action = StateAction::NoteAdded(note.id.clone());
            (note, Some(action))
        })
    }

    /// Replaces a note's fields and moves its tag reference.
    ///
    /// Returns `None` without touching any count when `id` is unknown.
    pub fn edit_note(&mut self, id: &NoteId, input: NoteInput) -> Option<Note> {
        self.transition(|snap| {
            let Some(previous) = snap.note(id).map(|note| note.tag_id.clone()) else {
                return (None, None);
            };
            let next = input.tag_id.clone();
            let updated = NoteStore::new(&mut snap.notes).update(id, input);

            if previous != next {
                let mut tags = TagStore::new(&mut snap.tags);
                if let Some(old_tag) = &previous {
                    tags.decrement_count(old_tag);
                }
                if let Some(new_tag) = &next {
                    tags.increment_count(new_tag);
                }
            }
            (updated, Some(StateAction::NoteEdited(id.clone())))
        })
    }

    /// Deletes a note and releases its tag reference.
    pub fn delete_note(&mut self, id: &NoteId) -> Option<Note> {
        self.transition(|snap| {
            let Some(removed) = NoteStore::new(&mut snap.notes).delete(id) else {
                return (None, None);
            };
            if let Some(tag_id) = &removed.tag_id {
                TagStore::new(&mut snap.tags).decrement_count(tag_id);
            }
            (Some(removed), Some(StateAction::NoteDeleted(id.clone())))
        })
    }

    /// Creates an unused tag.
    pub fn add_tag(&mut self, name: impl Into<String>) -> Tag {
        self.transition(|snap| {
            let tag = TagStore::new(&mut snap.tags).create(name);
            let action = StateAction::TagAdded(tag.id.clone());
            (tag, Some(action))
        })
    }

    /// Renames a tag; `None` when the tag does not exist.
    pub fn rename_tag(&mut self, id: &TagId, name: impl Into<String>) -> Option<Tag> {
        self.transition(|snap| match TagStore::new(&mut snap.tags).rename(id, name) {
            Some(tag) => (Some(tag), Some(StateAction::TagRenamed(id.clone()))),
            None => (None, None),
        })
    }

    /// Deletes an unused tag.
    ///
    /// # Errors
    /// - `TagInUse` when notes still reference the tag; nothing changes.
    /// - `TagNotFound` when the id is unknown.
    pub fn delete_tag(&mut self, id: &TagId) -> CoordinatorResult<Tag> {
        let result = self.transition(|snap| match TagStore::new(&mut snap.tags).delete(id) {
            TagRemoval::Removed(tag) => {
                let detached = NoteStore::new(&mut snap.notes).detach_tag(id);
                if detached > 0 {
                    warn!(
                        "event=tag_delete module=coordinator status=detached tag_id={} notes={}",
                        id, detached
                    );
                }
                (Ok(tag), Some(StateAction::TagDeleted(id.clone())))
            }
            TagRemoval::InUse { count } => (
                Err(CoordinatorError::TagInUse {
                    tag_id: id.clone(),
                    count,
                }),
                None,
            ),
            TagRemoval::Missing => (Err(CoordinatorError::TagNotFound(id.clone())), None),
        });

        if let Err(err) = &result {
            warn!(
                "event=tag_delete module=coordinator status=rejected tag_id={} reason={}",
                id, err
            );
        }
        result
    }

    /// Notes passing `filter`, in insertion order.
    pub fn filter_notes(&self, filter: &NoteFilter) -> Vec<Note> {
        filter_notes(&self.snapshot, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Tags whose name contains `term` case-insensitively.
    pub fn filter_tags(&self, term: &str) -> Vec<Tag> {
        filter_tags(&self.snapshot, term)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.snapshot.note(id).cloned()
    }

    pub fn tag(&self, id: &TagId) -> Option<Tag> {
        self.snapshot.tag(id).cloned()
    }

    /// Display name of a note's tag, if it is tagged with a live tag.
    pub fn tag_name_of(&self, note: &Note) -> Option<String> {
        let tag_id = note.tag_id.as_ref()?;
        self.snapshot.tag(tag_id).map(|tag| tag.name.clone())
    }

    pub fn note_count(&self) -> usize {
        self.snapshot.notes.len()
    }

    pub fn tag_count(&self) -> usize {
        self.snapshot.tags.len()
    }

    /// Runs `mutate` on a private copy; the copy replaces the current
    /// snapshot only when `mutate` reports an action.
    fn transition<T>(
        &mut self,
        mutate: impl FnOnce(&mut Snapshot) -> (T, Option<StateAction>),
    ) -> T {
        let mut working = Snapshot::clone(&self.snapshot);
        let (output, action) = mutate(&mut working);
        if let Some(action) = action {
            self.commit(working, action);
        }
        output
    }

    fn commit(&mut self, next: Snapshot, action: StateAction) {
        self.version += 1;
        self.snapshot = Arc::new(next);
        info!(
            "event={} module=coordinator status=ok version={} notes={} tags={}",
            action.name(),
            self.version,
            self.snapshot.notes.len(),
            self.snapshot.tags.len()
        );

        let change = SnapshotChange {
            version: self.version,
            action,
            snapshot: Arc::clone(&self.snapshot),
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}
