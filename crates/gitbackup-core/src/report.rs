//! What a pipeline run did, for the operator and for `--json` output.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use gitbackup_git::CommitInfo;
use serde::Serialize;

/// Outcome of one project export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub identity: String,
    pub project: String,
    pub workspace: PathBuf,
    /// Bytes streamed out of the container
    pub archive_bytes: u64,
    /// Regular files unpacked from the project archive
    pub files: usize,
    /// Full id of the new snapshot, `None` when nothing changed
    pub commit: Option<String>,
}

impl ExportReport {
    pub fn created_snapshot(&self) -> bool {
        self.commit.is_some()
    }
}

/// Outcome of one project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingReport {
    pub identity: String,
    pub workspace: PathBuf,
    /// Lines written to the manifest
    pub projects: usize,
    pub commit: Option<String>,
}

impl ListingReport {
    pub fn created_snapshot(&self) -> bool {
        self.commit.is_some()
    }
}

/// One snapshot of a workspace's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub hash: String,
    pub message: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl From<CommitInfo> for HistoryEntry {
    fn from(info: CommitInfo) -> Self {
        Self {
            hash: info.hash,
            message: info.message,
            author: info.author,
            timestamp: info.timestamp,
        }
    }
}
