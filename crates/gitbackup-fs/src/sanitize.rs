//! Clearing a workspace before a fresh export is unpacked into it

use std::fs;

use crate::{Error, NormalizedPath, Result, WorkspacePath};

/// Delete every top-level entry of `workspace` except the history directory.
///
/// Files and symlinks are unlinked (a symlink to a directory is never
/// followed), directories are removed recursively. A missing workspace is
/// a no-op. Returns the number of entries removed.
pub fn clean_except_history(workspace: &NormalizedPath) -> Result<usize> {
    let root = workspace.to_native();
    if !root.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(&root).map_err(|e| Error::io(&root, e))?;
    let mut removed = 0;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&root, e))?;
        let entry_path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io(&entry_path, e))?;

        if file_type.is_dir() && entry.file_name() == WorkspacePath::HistoryDir.as_str() {
            continue;
        }

        if file_type.is_dir() {
            fs::remove_dir_all(&entry_path).map_err(|e| Error::io(&entry_path, e))?;
        } else {
            fs::remove_file(&entry_path).map_err(|e| Error::io(&entry_path, e))?;
        }
        removed += 1;
    }

    tracing::debug!(workspace = %workspace, removed, "Workspace sanitized");
    Ok(removed)
}
