//! In-memory document store
//!
//! Serves a fixed set of users and projects with the same access rules as
//! [`crate::MongoStore`]. Failures can be switched on per query kind, and
//! every query is counted, so callers can assert what was (and was not)
//! asked of the store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{DocumentStore, Error, ProjectId, ProjectSummary, Result, UserId};

/// A project record held by [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    pub id: String,
    pub name: String,
    pub owner: Option<UserId>,
    pub collaborators: Vec<UserId>,
    pub read_only: Vec<UserId>,
    pub archived: bool,
    pub trashed: bool,
}

impl MemoryProject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn owned_by(mut self, user: &UserId) -> Self {
        self.owner = Some(user.clone());
        self
    }

    pub fn shared_with(mut self, user: &UserId) -> Self {
        self.collaborators.push(user.clone());
        self
    }

    pub fn read_only_for(mut self, user: &UserId) -> Self {
        self.read_only.push(user.clone());
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    pub fn trashed(mut self) -> Self {
        self.trashed = true;
        self
    }

    fn grants(&self, user: &UserId) -> bool {
        self.owner.as_ref() == Some(user)
            || self.collaborators.contains(user)
            || self.read_only.contains(user)
    }
}

/// Which queries should fail with [`Error::Unavailable`].
#[derive(Debug, Default)]
struct FailureSwitches {
    lookups: AtomicBool,
    access_checks: AtomicBool,
    listings: AtomicBool,
}

/// Query counters.
#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicUsize,
    access_checks: AtomicUsize,
    listings: AtomicUsize,
    closes: AtomicUsize,
}

/// Document store holding its data in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Vec<(String, UserId)>,
    projects: Vec<MemoryProject>,
    failures: FailureSwitches,
    counters: Counters,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, email: impl Into<String>, id: &UserId) -> Self {
        self.users.push((email.into(), id.clone()));
        self
    }

    pub fn with_project(mut self, project: MemoryProject) -> Self {
        self.projects.push(project);
        self
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.failures.lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_access_checks(&self, fail: bool) {
        self.failures.access_checks.store(fail, Ordering::SeqCst);
    }

    pub fn fail_listings(&self, fail: bool) {
        self.failures.listings.store(fail, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.counters.lookups.load(Ordering::SeqCst)
    }

    pub fn access_check_count(&self) -> usize {
        self.counters.access_checks.load(Ordering::SeqCst)
    }

    pub fn listing_count(&self) -> usize {
        self.counters.listings.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(Error::Unavailable {
                message: format!("{what} failed (simulated)"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn parse_project_id(&self, raw: &str) -> Result<ProjectId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(Error::InvalidProjectId {
                id: raw.to_string(),
                message: "expected a single non-empty token".to_string(),
            });
        }
        Ok(ProjectId::new(trimmed))
    }

    async fn find_user_id(&self, email: &str) -> Result<Option<UserId>> {
        self.counters.lookups.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.failures.lookups, "user lookup")?;
        Ok(self
            .users
            .iter()
            .find(|(candidate, _)| candidate == email)
            .map(|(_, id)| id.clone()))
    }

    async fn has_project_access(&self, user: &UserId, project: &ProjectId) -> Result<bool> {
        self.counters.access_checks.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.failures.access_checks, "access check")?;
        Ok(self
            .projects
            .iter()
            .any(|p| p.id == project.as_str() && p.grants(user)))
    }

    async fn list_accessible_projects(&self, user: &UserId) -> Result<Vec<ProjectSummary>> {
        self.counters.listings.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.failures.listings, "project listing")?;
        Ok(self
            .projects
            .iter()
            .filter(|p| p.grants(user) && !p.archived && !p.trashed)
            .map(|p| ProjectSummary::new(p.id.clone(), p.name.clone()))
            .collect())
    }

    async fn close(&self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}
