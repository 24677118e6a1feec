//! Case-insensitive substring search over entries.
//!
//! A linear scan over [`JournalEntry::haystack`]; no index. Results keep the
//! store's insertion order.

use super::store::EntryStore;
use super::types::JournalEntry;

impl EntryStore {
    /// Entries whose id, lists or reflection contain `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        if query.is_empty() {
            return self.list().iter().collect();
        }
        let needle = query.to_lowercase();
        self.list()
            .iter()
            .filter(|e| e.haystack().to_lowercase().contains(&needle))
            .collect()
    }
}
