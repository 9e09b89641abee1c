//! The export and listing pipelines
//!
//! Stages run strictly in order and the first failure aborts the rest.
//! Identity resolution and the access check happen before anything on the
//! host or in the container is touched.

use gitbackup_fs::io::{ensure_private_dir, write_text};
use gitbackup_fs::permissions::{PRIVATE_TREE_MODE, SHARED_TREE_MODE, set_mode_recursive};
use gitbackup_fs::{NormalizedPath, WorkspaceLock, clean_except_history, validate_path_component};
use gitbackup_git::{commit_snapshot, list_recent_commits, open_or_init};
use gitbackup_remote::{ExportRequest, ExportRuntime};
use gitbackup_store::{DocumentStore, ProjectId, ProjectSummary, UserId, canonical_project_id};

use crate::archive::{unwrap_export, write_stream};
use crate::report::HistoryEntry;
use crate::{BackupConfig, Error, ExportReport, ListingReport, Result};

/// Suffix of the transport archive written beside the export zip.
const TRANSPORT_SUFFIX: &str = ".tar";

/// Runs pipelines against one store and, for exports, one container runtime.
pub struct Pipeline<'a> {
    config: &'a BackupConfig,
    store: &'a dyn DocumentStore,
    runtime: Option<&'a dyn ExportRuntime>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a BackupConfig, store: &'a dyn DocumentStore) -> Self {
        Self {
            config,
            store,
            runtime: None,
        }
    }

    pub fn with_runtime(mut self, runtime: &'a dyn ExportRuntime) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Export one project and commit it as a snapshot of
    /// `<host>/<identity>/<project>.git`.
    pub async fn export_project(&self, identity: &str, project: &str) -> Result<ExportReport> {
        let layout = self.config.layout();
        let identity_dir = layout.identity_dir(identity)?;
        validate_path_component(project, "project id")?;
        let runtime = self
            .runtime
            .ok_or_else(|| Error::configuration("project export needs a container runtime"))?;
        let project_id = self.store.parse_project_id(project)?;
        let workspace = layout.project_workspace(identity, project_id.as_str())?;

        let user = self.resolve_identity(identity).await?;
        self.authorize(identity, &user, &project_id).await?;

        ensure_private_dir(&identity_dir)?;
        let _lock = WorkspaceLock::acquire(&workspace, self.config.lock_wait())?;

        let target = runtime.locate().await?;
        let request = ExportRequest::new(
            user.as_str(),
            project_id.as_str(),
            self.config.overleaf_path.as_str(),
        );
        tracing::info!(identity, project, container = %target.name, "Running export");
        runtime.run_export(&target, &request).await?;

        let stream = runtime.fetch_archive(&target, &request.remote_path()).await?;

        ensure_private_dir(&workspace)?;
        let removed = clean_except_history(&workspace)?;
        tracing::debug!(workspace = %workspace, removed, "Workspace cleared");

        let inner_name = request.archive_name();
        let tar_path = workspace.join(&format!("{inner_name}{TRANSPORT_SUFFIX}"));
        let archive_bytes = write_stream(stream, &tar_path).await?;
        let files = unwrap_export(&workspace, &tar_path, &inner_name)?;
        set_mode_recursive(&workspace, SHARED_TREE_MODE)?;

        let commit = self.snapshot(&workspace)?;
        match &commit {
            Some(id) => tracing::info!(identity, project, commit = %id, "Snapshot committed"),
            None => tracing::info!(identity, project, "No changes since last snapshot"),
        }

        Ok(ExportReport {
            identity: identity.to_string(),
            project: project_id.to_string(),
            workspace: workspace.to_native(),
            archive_bytes,
            files,
            commit,
        })
    }

    /// Write every project `identity` can access to
    /// `<host>/<identity>/projects.git/projects.txt` and commit it.
    pub async fn snapshot_project_list(&self, identity: &str) -> Result<ListingReport> {
        let layout = self.config.layout();
        let workspace = layout.listing_workspace(identity)?;
        let identity_dir = layout.identity_dir(identity)?;
        let manifest = layout.manifest_path(identity)?;

        let user = self.resolve_identity(identity).await?;
        let projects = self.store.list_accessible_projects(&user).await?;
        tracing::debug!(identity, count = projects.len(), "Listed accessible projects");

        ensure_private_dir(&identity_dir)?;
        let _lock = WorkspaceLock::acquire(&workspace, self.config.lock_wait())?;
        ensure_private_dir(&workspace)?;

        write_text(&manifest, &render_manifest(&projects))?;
        let commit = self.snapshot(&workspace)?;
        set_mode_recursive(&workspace, PRIVATE_TREE_MODE)?;

        match &commit {
            Some(id) => tracing::info!(identity, commit = %id, "Project list committed"),
            None => tracing::info!(identity, "Project list unchanged"),
        }

        Ok(ListingReport {
            identity: identity.to_string(),
            workspace: workspace.to_native(),
            projects: projects.len(),
            commit,
        })
    }

    async fn resolve_identity(&self, identity: &str) -> Result<UserId> {
        match self.store.find_user_id(identity).await? {
            Some(user) => {
                tracing::debug!(identity, user = %user, "Identity resolved");
                Ok(user)
            }
            None => Err(Error::IdentityNotFound {
                identity: identity.to_string(),
            }),
        }
    }

    async fn authorize(&self, identity: &str, user: &UserId, project: &ProjectId) -> Result<()> {
        match self.store.has_project_access(user, project).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::Unauthorized {
                identity: identity.to_string(),
                project: project.to_string(),
            }),
            Err(source) => {
                tracing::warn!(identity, project = %project, error = %source, "Access check failed, denying");
                Err(Error::AccessCheckUnavailable {
                    project: project.to_string(),
                    source,
                })
            }
        }
    }

    fn snapshot(&self, workspace: &NormalizedPath) -> Result<Option<String>> {
        let repo = open_or_init(workspace)?;
        let oid = commit_snapshot(&repo, &self.config.author(), &self.config.commit_message)?;
        Ok(oid.map(|id| id.to_string()))
    }
}

/// One `<id> ; "<name>"` line per project, each newline-terminated.
pub fn render_manifest(projects: &[ProjectSummary]) -> String {
    projects
        .iter()
        .map(|p| format!("{}\n", p.manifest_line()))
        .collect()
}

/// Recent snapshots of a project workspace, or of the listing workspace
/// when `project` is `None`. Most recent first.
pub fn history(
    config: &BackupConfig,
    identity: &str,
    project: Option<&str>,
    limit: usize,
) -> Result<Vec<HistoryEntry>> {
    let layout = config.layout();
    let workspace = match project {
        Some(project) => layout.project_workspace(identity, &canonical_project_id(project))?,
        None => layout.listing_workspace(identity)?,
    };

    let commits = list_recent_commits(&workspace, limit)?;
    Ok(commits.into_iter().map(HistoryEntry::from).collect())
}
