//! Recording a workspace as a new snapshot

use git2::{ErrorCode, IndexAddOption, Oid, Repository, Signature};
use gitbackup_fs::{NormalizedPath, WorkspacePath};

use crate::{Error, Result};

/// Commit message used when none is configured.
pub const DEFAULT_COMMIT_MESSAGE: &str = "by Overleaf CEP";

/// Identity recorded on snapshot commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotAuthor {
    pub name: String,
    pub email: String,
}

impl SnapshotAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Signature::now(&self.name, &self.email).map_err(|e| Error::InvalidAuthor {
            name: self.name.clone(),
            email: self.email.clone(),
            message: e.message().to_string(),
        })
    }
}

impl Default for SnapshotAuthor {
    fn default() -> Self {
        Self::new("gitbackup", "gitbackup@localhost")
    }
}

/// Open the history repository of `workspace`, creating it if absent.
pub fn open_or_init(workspace: &NormalizedPath) -> Result<Repository> {
    let history = workspace.join(WorkspacePath::HistoryDir.as_str());
    if history.is_dir() {
        Ok(Repository::open(workspace.to_native())?)
    } else {
        tracing::info!(workspace = %workspace, "Initializing snapshot history");
        Ok(Repository::init(workspace.to_native())?)
    }
}

/// Stage additions, modifications and deletions of the whole working tree.
///
/// Returns the id of the tree the index now describes.
fn stage_all(repo: &Repository) -> Result<Oid> {
    let mut index = repo.index()?;
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"].iter(), None)?;
    index.write()?;
    Ok(index.write_tree()?)
}

/// Stage everything in the workspace and commit it.
///
/// Returns `None` when the staged tree equals the tree of the current
/// snapshot (or is empty on a repository with no snapshot yet); no commit
/// is written in that case.
pub fn commit_snapshot(
    repo: &Repository,
    author: &SnapshotAuthor,
    message: &str,
) -> Result<Option<Oid>> {
    let tree_id = stage_all(repo)?;
    let tree = repo.find_tree(tree_id)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
        Err(e) => return Err(e.into()),
    };

    let unchanged = match &parent {
        Some(commit) => commit.tree_id() == tree_id,
        None => tree.is_empty(),
    };
    if unchanged {
        tracing::info!("Workspace unchanged since last snapshot, nothing to commit");
        return Ok(None);
    }

    let signature = author.signature()?;
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;

    tracing::info!(commit = %oid, "Snapshot recorded");
    Ok(Some(oid))
}
