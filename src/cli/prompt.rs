use anyhow::{Context, Result};

use crate::config::DaybookConfig;
use crate::feedback::{render_prompt, PromptFields};
use crate::journal::EntryStore;
use crate::persist::Snapshot;

/// Print the feedback prompt that would be sent for entry `id`. No network access.
pub fn prompt(config: &DaybookConfig, id: &str) -> Result<()> {
    let snapshot = Snapshot::new(config.resolved_data_path());
    let store = EntryStore::from_entries(snapshot.read()?.unwrap_or_default());

    let entry = store
        .get(id)
        .with_context(|| format!("no entry {id} in {}", snapshot.path().display()))?;

    print!("{}", render_prompt(&PromptFields::from(entry)));
    Ok(())
}
