//! Invocation settings
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by the caller).

use std::path::{Path, PathBuf};
use std::time::Duration;

use gitbackup_fs::BackupLayout;
use gitbackup_git::{DEFAULT_COMMIT_MESSAGE, SnapshotAuthor};
use gitbackup_remote::ExportCommand;
use gitbackup_remote::command::{DEFAULT_EXPORT_SCRIPT, DEFAULT_WEB_DIR};
use gitbackup_store::StoreAddress;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Document store connection string.
pub const ENV_MONGO_URL: &str = "OVERLEAF_MONGO_URL";
/// Name of the running platform container.
pub const ENV_CONTAINER_NAME: &str = "OVERLEAF_CONTAINER_NAME";
/// Directory inside the container exports are written to.
pub const ENV_OVERLEAF_PATH: &str = "GITBACKUP_OVERLEAF_PATH";
/// Host directory holding every identity's workspaces.
pub const ENV_HOST_PATH: &str = "GITBACKUP_HOST_PATH";

pub const DEFAULT_OVERLEAF_PATH: &str = "/var/lib/overleaf/";
pub const DEFAULT_HOST_PATH: &str = "/downloads/";
pub const DEFAULT_EXPORT_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_LOCK_WAIT_SECS: u64 = 30;

fn default_overleaf_path() -> String {
    DEFAULT_OVERLEAF_PATH.to_string()
}

fn default_host_path() -> PathBuf {
    PathBuf::from(DEFAULT_HOST_PATH)
}

fn default_web_dir() -> String {
    DEFAULT_WEB_DIR.to_string()
}

fn default_export_script() -> String {
    DEFAULT_EXPORT_SCRIPT.to_string()
}

fn default_export_timeout() -> u64 {
    DEFAULT_EXPORT_TIMEOUT_SECS
}

fn default_lock_wait() -> u64 {
    DEFAULT_LOCK_WAIT_SECS
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

/// Commit author settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSection {
    pub name: String,
    pub email: String,
}

impl Default for AuthorSection {
    fn default() -> Self {
        let author = SnapshotAuthor::default();
        Self {
            name: author.name,
            email: author.email,
        }
    }
}

/// Everything one invocation needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupConfig {
    /// Document store URI. Required by both pipelines.
    #[serde(default)]
    pub mongo_url: Option<String>,

    /// Platform container name. Required by the export pipeline only.
    #[serde(default)]
    pub container_name: Option<String>,

    #[serde(default = "default_overleaf_path")]
    pub overleaf_path: String,

    #[serde(default = "default_host_path")]
    pub host_path: PathBuf,

    #[serde(default = "default_web_dir")]
    pub web_dir: String,

    #[serde(default = "default_export_script")]
    pub export_script: String,

    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// How long to wait for another run holding the same workspace
    #[serde(default = "default_lock_wait")]
    pub lock_wait_secs: u64,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub author: AuthorSection,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            mongo_url: None,
            container_name: None,
            overleaf_path: default_overleaf_path(),
            host_path: default_host_path(),
            web_dir: default_web_dir(),
            export_script: default_export_script(),
            export_timeout_secs: default_export_timeout(),
            lock_wait_secs: default_lock_wait(),
            commit_message: default_commit_message(),
            author: AuthorSection::default(),
        }
    }
}

impl BackupConfig {
    /// Parse settings from TOML content. Missing keys take their defaults.
    pub fn parse(content: &str) -> Result<Self> {
        let config: BackupConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Read and parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Overlay values found through `lookup`. Empty values are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_MONGO_URL) {
            self.mongo_url = Some(v);
        }
        if let Some(v) = get(ENV_CONTAINER_NAME) {
            self.container_name = Some(v);
        }
        if let Some(v) = get(ENV_OVERLEAF_PATH) {
            self.overleaf_path = v;
        }
        if let Some(v) = get(ENV_HOST_PATH) {
            self.host_path = PathBuf::from(v);
        }
        self
    }

    /// Overlay the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// The parsed store address, or a configuration error if it is absent
    /// or malformed.
    pub fn store_address(&self) -> Result<StoreAddress> {
        let uri = self
            .mongo_url
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(format!("document store URI not set ({ENV_MONGO_URL})"))
            })?;
        StoreAddress::parse(uri).map_err(|e| Error::configuration(e.to_string()))
    }

    /// The container name, required for project export.
    pub fn container_name(&self) -> Result<&str> {
        self.container_name
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(format!("container name not set ({ENV_CONTAINER_NAME})"))
            })
    }

    pub fn layout(&self) -> BackupLayout {
        BackupLayout::new(self.host_path.as_path())
    }

    pub fn export_command(&self) -> ExportCommand {
        ExportCommand {
            web_dir: self.web_dir.clone(),
            script: self.export_script.clone(),
            deadline: Duration::from_secs(self.export_timeout_secs),
        }
    }

    pub fn author(&self) -> SnapshotAuthor {
        SnapshotAuthor::new(&self.author.name, &self.author.email)
    }

    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(self.lock_wait_secs)
    }
}
