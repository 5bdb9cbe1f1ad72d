//! Selectable tag and project collections.

use crate::board::domain::{Project, ProjectId, Tag, TagId, Task};

/// An entity that can be kept in a [`Registry`].
pub trait RegistryEntry: Clone {
    /// Identifier type.
    type Id: PartialEq;

    /// Returns the entry identifier.
    fn entry_id(&self) -> &Self::Id;
}

impl RegistryEntry for Tag {
    type Id = TagId;

    fn entry_id(&self) -> &TagId {
        self.id()
    }
}

impl RegistryEntry for Project {
    type Id = ProjectId;

    fn entry_id(&self) -> &ProjectId {
        self.id()
    }
}

/// Ordered in-memory collection of entries, unique by identifier.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: Vec<T>,
}

/// Registry of selectable tags.
pub type TagRegistry = Registry<Tag>;

/// Registry of selectable projects.
pub type ProjectRegistry = Registry<Project>;

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: RegistryEntry> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every entry, keeping the first of any duplicate identifiers.
    pub fn replace_all(&mut self, entries: impl IntoIterator<Item = T>) {
        self.entries.clear();
        for entry in entries {
            if self.get(entry.entry_id()).is_none() {
                self.entries.push(entry);
            }
        }
    }

    /// Appends `entry`, or replaces the entry with the same identifier in
    /// place.
    pub fn add(&mut self, entry: T) {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.entry_id() == entry.entry_id())
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Returns the entry with `id`.
    #[must_use]
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.entries.iter().find(|entry| entry.entry_id() == id)
    }

    /// Returns every entry in order.
    #[must_use]
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TagRegistry {
    /// Resolves the tags of `task`, silently omitting identifiers that no
    /// longer exist.
    #[must_use]
    pub fn resolve(&self, task: &Task) -> Vec<Tag> {
        task.tags()
            .iter()
            .filter_map(|id| self.get(id).cloned())
            .collect()
    }
}

impl ProjectRegistry {
    /// Resolves the project of `task`, if it exists.
    #[must_use]
    pub fn resolve(&self, task: &Task) -> Option<Project> {
        task.project_id().and_then(|id| self.get(id).cloned())
    }
}
