//! Ordered tag collection operations with reference counts.

use crate::model::id::TagId;
use crate::model::tag::Tag;
use log::warn;

/// Outcome of a conditional tag delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TagRemoval {
    Removed(Tag),
    InUse { count: u32 },
    Missing,
}

/// Mutable view over the tag collection of a working snapshot.
pub(crate) struct TagStore<'snap> {
    tags: &'snap mut Vec<Tag>,
}

impl<'snap> TagStore<'snap> {
    pub(crate) fn new(tags: &'snap mut Vec<Tag>) -> Self {
        Self { tags }
    }

    /// Appends a new tag with `count = 0`.
    pub(crate) fn create(&mut self, name: impl Into<String>) -> Tag {
        let tag = Tag::new(name);
        self.tags.push(tag.clone());
        tag
    }

    pub(crate) fn rename(&mut self, id: &TagId, name: impl Into<String>) -> Option<Tag> {
        let tag = self.find_mut(id)?;
        tag.name = name.into();
        Some(tag.clone())
    }

    /// Removes `id` only when its count is zero; otherwise leaves the
    /// collection untouched.
    pub(crate) fn delete(&mut self, id: &TagId) -> TagRemoval {
        let Some(index) = self.tags.iter().position(|tag| &tag.id == id) else {
            return TagRemoval::Missing;
        };
        if self.tags[index].is_in_use() {
            return TagRemoval::InUse {
                count: self.tags[index].count,
            };
        }
        TagRemoval::Removed(self.tags.remove(index))
    }

    /// Returns the new count, or `None` when the tag does not exist.
    ///
    /// A count already at `u32::MAX` stays there and is logged.
    pub(crate) fn increment_count(&mut self, id: &TagId) -> Option<u32> {
        let tag = self.find_mut(id)?;
        match tag.count.checked_add(1) {
            Some(next) => tag.count = next,
            None => {
                warn!(
                    "event=tag_count_overflow module=store status=clamped tag_id={}",
                    tag.id
                );
            }
        }
        Some(tag.count)
    }

    /// Returns the new count, or `None` when the tag does not exist.
    ///
    /// A decrement at zero stays at zero and is logged; it only happens
    /// when counts were already out of sync before this call.
    pub(crate) fn decrement_count(&mut self, id: &TagId) -> Option<u32> {
        let tag = self.find_mut(id)?;
        match tag.count.checked_sub(1) {
            Some(next) => tag.count = next,
            None => {
                warn!(
                    "event=tag_count_underflow module=store status=clamped tag_id={}",
                    tag.id
                );
            }
        }
        Some(tag.count)
    }

    fn find_mut(&mut self, id: &TagId) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|tag| &tag.id == id)
    }
}
