//! `gitbackup project`

use colored::Colorize;
use gitbackup_core::{BackupConfig, Session};

use super::{print_json, short};
use crate::error::Result;

pub async fn run_project(config: BackupConfig, identity: &str, project: &str, json: bool) -> Result<()> {
    let session = Session::connect_for_export(config).await?;
    let report = session.export_project(identity, project).await?;

    if json {
        return print_json(&report);
    }

    match &report.commit {
        Some(id) => println!(
            "{} {}/{} snapshot {} ({} files)",
            "OK".green().bold(),
            identity,
            report.project,
            short(id).cyan(),
            report.files,
        ),
        None => println!(
            "{} {}/{} unchanged since last snapshot",
            "OK".green().bold(),
            identity,
            report.project,
        ),
    }
    Ok(())
}
