pub mod flush;

pub use flush::ShutdownFlush;

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::journal::{EntryStore, JournalEntry};

/// Snapshot read/write failures. Logged by callers, never sent to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {} is not a JSON array of entries: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize entries: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The JSON file the whole store is materialized from and written back to.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. `Ok(None)` when the file does not exist.
    ///
    /// The top level must be a JSON array. Elements are decoded leniently (see
    /// [`JournalEntry::from_stored`]); non-object elements are skipped, and when
    /// any are the file is backed up first so a later save cannot lose them.
    pub fn read(&self) -> Result<Option<Vec<JournalEntry>>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|source| {
            PersistenceError::Read {
                path: self.path.clone(),
                source,
            }
        })?;
        let raw: Vec<Value> =
            serde_json::from_str(&contents).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let total = raw.len();
        let entries: Vec<JournalEntry> =
            raw.into_iter().filter_map(JournalEntry::from_stored).collect();
        let skipped = total - entries.len();
        if skipped > 0 {
            tracing::warn!(
                path = %self.path.display(),
                skipped,
                "snapshot has elements that are not entries, skipping them"
            );
            self.backup();
        }
        Ok(Some(entries))
    }

    /// Load the startup store. Any failure is logged and yields an empty store.
    ///
    /// An unreadable file is copied aside before the empty store is returned,
    /// since the shutdown save will overwrite it.
    pub fn load(&self) -> EntryStore {
        match self.read() {
            Ok(Some(entries)) => {
                tracing::info!(
                    path = %self.path.display(),
                    count = entries.len(),
                    "loaded journal entries from snapshot"
                );
                EntryStore::from_entries(entries)
            }
            Ok(None) => {
                tracing::info!(
                    path = %self.path.display(),
                    "no snapshot found, starting with an empty journal"
                );
                EntryStore::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load snapshot, starting with an empty journal");
                self.backup();
                EntryStore::new()
            }
        }
    }

    /// Copy the current file to `<name>.<timestamp>.bak` next to it.
    pub fn backup(&self) -> Option<PathBuf> {
        let name = self.path.file_name()?.to_string_lossy();
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%3f");
        let backup_path = self.path.with_file_name(format!("{name}.{stamp}.bak"));

        match std::fs::copy(&self.path, &backup_path) {
            Ok(_) => {
                tracing::warn!(backup = %backup_path.display(), "copied unreadable snapshot aside");
                Some(backup_path)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %self.path.display(),
                    "failed to back up snapshot"
                );
                None
            }
        }
    }

    /// Overwrite the snapshot with `entries`, pretty-printed.
    ///
    /// Writes to a sibling `.tmp` file and renames it over the target.
    pub fn save(&self, entries: &[JournalEntry]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(entries).map_err(PersistenceError::Serialize)?;

        let write_err = |source: std::io::Error| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(write_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(write_err)?;

        tracing::info!(
            path = %self.path.display(),
            count = entries.len(),
            "snapshot saved"
        );
        Ok(())
    }
}
