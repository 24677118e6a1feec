use anyhow::{Context, Result};

use crate::config::DaybookConfig;
use crate::persist::Snapshot;

/// Print every stored entry as pretty JSON to stdout.
pub fn export(config: &DaybookConfig) -> Result<()> {
    let snapshot = Snapshot::new(config.resolved_data_path());
    let entries = snapshot.read()?.unwrap_or_default();

    let json = serde_json::to_string_pretty(&entries).context("failed to serialize entries")?;
    println!("{json}");

    eprintln!(
        "Exported {} entries from {}.",
        entries.len(),
        snapshot.path().display()
    );
    Ok(())
}
