//! `gitbackup projects`

use colored::Colorize;
use gitbackup_core::{BackupConfig, Session};

use super::{print_json, short};
use crate::error::Result;

pub async fn run_projects(config: BackupConfig, identity: &str, json: bool) -> Result<()> {
    let session = Session::connect_for_listing(config).await?;
    let report = session.snapshot_project_list(identity).await?;

    if json {
        return print_json(&report);
    }

    let status = match &report.commit {
        Some(id) => format!("snapshot {}", short(id).cyan()),
        None => "unchanged".to_string(),
    };
    println!(
        "{} {} has {} projects, {}",
        "OK".green().bold(),
        identity,
        report.projects,
        status,
    );
    Ok(())
}
