//! `gitbackup history`

use colored::Colorize;
use gitbackup_core::BackupConfig;
use gitbackup_core::pipeline::history;

use super::print_json;
use crate::error::Result;

pub fn run_history(
    config: &BackupConfig,
    identity: &str,
    project: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let entries = history(config, identity, project, limit)?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No snapshots yet.");
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{} {} {}",
            entry.hash.yellow(),
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            entry.message,
        );
    }
    Ok(())
}
