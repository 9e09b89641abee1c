//! Snapshot history for gitbackup workspaces
//!
//! Every workspace is a plain git repository. A run stages the whole
//! working tree and records one commit, or nothing when the tree is
//! unchanged since the previous snapshot.

pub mod commits;
pub mod error;
pub mod snapshot;

pub use commits::{CommitInfo, list_recent_commits};
pub use error::{Error, Result};
pub use snapshot::{DEFAULT_COMMIT_MESSAGE, SnapshotAuthor, commit_snapshot, open_or_init};
