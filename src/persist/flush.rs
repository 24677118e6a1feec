//! Exactly-once shutdown flush.
//!
//! The server asks for a save once its connections have drained. [`ShutdownFlush`]
//! makes that the only write: the first caller saves the snapshot, later callers
//! return immediately. Dropping the guard flushes too, so the save still runs when
//! the server exits with an error.

use std::sync::Once;

use super::Snapshot;
use crate::journal::SharedStore;

pub struct ShutdownFlush {
    store: SharedStore,
    snapshot: Snapshot,
    once: Once,
}

impl ShutdownFlush {
    pub fn new(store: SharedStore, snapshot: Snapshot) -> Self {
        Self {
            store,
            snapshot,
            once: Once::new(),
        }
    }

    /// Save the store unless a save already ran. Returns `true` for the call that
    /// performed the save (whether or not the write succeeded).
    ///
    /// Concurrent callers block until the first one finishes.
    pub fn flush(&self) -> bool {
        let mut ran = false;
        self.once.call_once(|| {
            ran = true;
            // A panicked writer cannot leave the Vec half-mutated, so a poisoned
            // lock still holds a consistent store.
            let store = self.store.read().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = self.snapshot.save(store.list()) {
                tracing::error!(error = %e, "failed to save snapshot on shutdown");
            }
        });
        ran
    }

    pub fn is_flushed(&self) -> bool {
        self.once.is_completed()
    }
}

impl Drop for ShutdownFlush {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntryStore, JournalEntry};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn second_flush_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        let snapshot = Snapshot::new(tmp.path().join("entries.json"));
        let store = EntryStore::from_entries(vec![JournalEntry::new("2024-01-01")]).into_shared();
        let guard = ShutdownFlush::new(store, snapshot.clone());

        assert!(guard.flush());
        assert!(guard.is_flushed());
        std::fs::remove_file(snapshot.path()).unwrap();

        assert!(!guard.flush());
        drop(guard);
        assert!(!snapshot.path().exists(), "save must not run twice");
    }

    #[test]
    fn drop_flushes() {
        let tmp = TempDir::new().unwrap();
        let snapshot = Snapshot::new(tmp.path().join("entries.json"));
        let store = EntryStore::new().into_shared();
        store.write().unwrap().create(JournalEntry::new("2024-03-03")).unwrap();

        drop(ShutdownFlush::new(store, snapshot.clone()));

        let loaded = snapshot.read().unwrap().unwrap();
        assert_eq!(loaded, vec![JournalEntry::new("2024-03-03")]);
    }

    #[test]
    fn concurrent_flushes_save_once() {
        let tmp = TempDir::new().unwrap();
        let snapshot = Snapshot::new(tmp.path().join("entries.json"));
        let guard = Arc::new(ShutdownFlush::new(EntryStore::new().into_shared(), snapshot));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                std::thread::spawn(move || guard.flush())
            })
            .collect();
        let saves = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ran| *ran)
            .count();

        assert_eq!(saves, 1);
    }
}
