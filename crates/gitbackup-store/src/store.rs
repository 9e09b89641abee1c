//! The document store seam

use async_trait::async_trait;

use crate::{ProjectId, ProjectSummary, Result, UserId};

/// Read access to identities and projects.
///
/// One value is opened per invocation and shared by every stage; callers
/// must call [`DocumentStore::close`] before dropping it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Parse a caller-supplied project id into the store's native format.
    fn parse_project_id(&self, raw: &str) -> Result<ProjectId>;

    /// Resolve an account email to its internal id. `Ok(None)` means no
    /// such account; `Err` means the store could not be queried.
    async fn find_user_id(&self, email: &str) -> Result<Option<UserId>>;

    /// Whether `user` owns, collaborates on, or has read-only access to
    /// `project`. A missing project is `Ok(false)`.
    async fn has_project_access(&self, user: &UserId, project: &ProjectId) -> Result<bool>;

    /// Every project `user` can access that is neither archived nor
    /// trashed, in the order the store returns them.
    async fn list_accessible_projects(&self, user: &UserId) -> Result<Vec<ProjectSummary>>;

    /// Release the connection.
    async fn close(&self);
}
