//! CLI `add` command: append an entry to the snapshot without running the server.
//!
//! Writes the file directly, so a server running against the same snapshot will
//! overwrite this entry when it shuts down.

use anyhow::{Context, Result};

use super::split_tags;
use crate::config::DaybookConfig;
use crate::journal::{EntryStore, JournalEntry};
use crate::persist::Snapshot;

/// Fields for a new entry as typed on the command line.
#[derive(Debug, Default)]
pub struct NewEntry {
    /// `yyyy-mm-dd`; today's local date when absent.
    pub date: Option<String>,
    pub todo: String,
    pub wins: String,
    pub emotions: String,
    pub reflection: String,
}

impl NewEntry {
    pub fn into_entry(self) -> Result<JournalEntry> {
        let id = match self.date {
            Some(date) => {
                chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .with_context(|| format!("invalid date {date:?}, expected yyyy-mm-dd"))?;
                date
            }
            None => today_id(),
        };

        Ok(JournalEntry {
            todo: split_tags(&self.todo),
            wins: split_tags(&self.wins),
            emotions: split_tags(&self.emotions),
            reflection: self.reflection,
            ..JournalEntry::new(id)
        })
    }
}

/// Today's local date as an entry id.
pub fn today_id() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Append `new` to the snapshot at the configured path.
pub fn add(config: &DaybookConfig, new: NewEntry) -> Result<()> {
    let snapshot = Snapshot::new(config.resolved_data_path());
    let mut store = EntryStore::from_entries(snapshot.read()?.unwrap_or_default());

    let entry = new.into_entry()?;
    let id = store.create(entry)?.id.clone();
    snapshot.save(store.list())?;

    println!(
        "Added entry {id} ({} total) to {}",
        store.len(),
        snapshot.path().display()
    );
    Ok(())
}
