//! Reading back the snapshot history of a workspace.

use chrono::{DateTime, TimeZone, Utc};
use git2::{ErrorCode, Repository};
use gitbackup_fs::{NormalizedPath, WorkspacePath};

use crate::{Error, Result};

/// Information about a single snapshot.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    /// Commit author name
    pub author: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

/// List the last `max_count` snapshots of `workspace`, most recent first.
///
/// A workspace whose history exists but holds no commit yields an empty
/// list; a workspace without history is [`Error::NoHistory`].
pub fn list_recent_commits(workspace: &NormalizedPath, max_count: usize) -> Result<Vec<CommitInfo>> {
    if !workspace.join(WorkspacePath::HistoryDir.as_str()).is_dir() {
        return Err(Error::NoHistory {
            path: workspace.to_native(),
        });
    }
    let repo = Repository::open(workspace.to_native())?;

    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    let commit = head.peel_to_commit()?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push(commit.id())?;
    revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count);

    for oid_result in revwalk.take(max_count) {
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        let dt: DateTime<Utc> = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_default();

        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();

        let author = commit.author().name().unwrap_or("Unknown").to_string();

        commits.push(CommitInfo {
            hash: format!("{:.7}", oid),
            message,
            author,
            timestamp: dt,
        });
    }

    Ok(commits)
}
