//! Where workspaces live under the host root
//!
//! ```text
//! <host-root>/
//!   <identity>/
//!     <project-id>.git/      one workspace per accessible project
//!     projects.git/          listing workspace holding projects.txt
//!     .<workspace>.lock      advisory lock files, outside the workspaces
//! ```

use crate::{NormalizedPath, Result, WorkspacePath, validate_path_component};

/// Resolves workspace locations for identities and projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLayout {
    /// Root directory holding one subdirectory per identity
    pub root: NormalizedPath,
}

impl BackupLayout {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding every workspace of `identity`.
    pub fn identity_dir(&self, identity: &str) -> Result<NormalizedPath> {
        validate_path_component(identity, "identity")?;
        Ok(self.root.join(identity))
    }

    /// Workspace for one exported project: `<identity>/<project>.git`.
    pub fn project_workspace(&self, identity: &str, project_id: &str) -> Result<NormalizedPath> {
        validate_path_component(project_id, "project id")?;
        let name = format!("{}{}", project_id, WorkspacePath::WorkspaceSuffix);
        Ok(self.identity_dir(identity)?.join(&name))
    }

    /// Workspace for the project listing: `<identity>/projects.git`.
    pub fn listing_workspace(&self, identity: &str) -> Result<NormalizedPath> {
        Ok(self
            .identity_dir(identity)?
            .join(WorkspacePath::ListingWorkspace.as_str()))
    }

    /// Manifest file inside the listing workspace.
    pub fn manifest_path(&self, identity: &str) -> Result<NormalizedPath> {
        Ok(self
            .listing_workspace(identity)?
            .join(WorkspacePath::Manifest.as_str()))
    }
}

/// Lock file guarding `workspace`.
///
/// Placed next to the workspace rather than inside it, so the sanitizer
/// never deletes a lock that is currently held.
pub fn lock_path_for(workspace: &NormalizedPath) -> NormalizedPath {
    let name = workspace.file_name().unwrap_or("workspace");
    let lock_name = format!(".{}.lock", name);
    match workspace.parent() {
        Some(parent) => parent.join(&lock_name),
        None => NormalizedPath::new(lock_name),
    }
}
