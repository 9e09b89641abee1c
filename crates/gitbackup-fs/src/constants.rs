//! Well-known names inside the backup tree.

use std::path::Path;

/// Fixed file and directory names used under the host root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspacePath {
    /// The `.git` history directory kept inside every workspace
    HistoryDir,
    /// Suffix appended to a project id to form its workspace directory
    WorkspaceSuffix,
    /// The `projects.git` listing workspace
    ListingWorkspace,
    /// The `projects.txt` manifest inside the listing workspace
    Manifest,
}

impl WorkspacePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HistoryDir => ".git",
            Self::WorkspaceSuffix => ".git",
            Self::ListingWorkspace => "projects.git",
            Self::Manifest => "projects.txt",
        }
    }
}

impl AsRef<Path> for WorkspacePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WorkspacePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
