//! The in-memory entry store.
//!
//! [`EntryStore`] is a plain ordered `Vec` scanned linearly. It is owned by whoever
//! builds it and shared with the HTTP layer through a [`SharedStore`] handle.

use std::sync::{Arc, RwLock};

use super::types::{EntryPatch, JournalEntry};
use super::StoreError;

/// Handle the server and the shutdown flush share.
pub type SharedStore = Arc<RwLock<EntryStore>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    entries: Vec<JournalEntry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-loaded entries. No validation: snapshot contents are trusted.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every entry in insertion order.
    pub fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// First entry whose id equals `id`.
    pub fn get(&self, id: &str) -> Result<&JournalEntry, StoreError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Append `entry`. Duplicate ids are accepted.
    pub fn create(&mut self, entry: JournalEntry) -> Result<&JournalEntry, StoreError> {
        if entry.id.is_empty() {
            return Err(StoreError::Validation("Missing id".into()));
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Shallow-merge `patch` onto the first entry matching `id`.
    ///
    /// The merge is computed on a copy and only swapped in once it decodes, so a
    /// rejected patch leaves the store as it was.
    pub fn update(&mut self, id: &str, patch: &EntryPatch) -> Result<&JournalEntry, StoreError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let merged = patch.apply_to(&self.entries[idx])?;
        self.entries[idx] = merged;
        Ok(&self.entries[idx])
    }

    /// Remove every entry with this id. Returns how many went.
    pub fn delete(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
