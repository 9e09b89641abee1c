//! Command implementations

mod history;
mod project;
mod projects;

use std::path::{Path, PathBuf};

use gitbackup_core::BackupConfig;
use serde::Serialize;

use crate::cli::Cli;
use crate::error::Result;

pub use history::run_history;
pub use project::run_project;
pub use projects::run_projects;

/// Settings given as flags; these win over file and environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Overrides {
    pub mongo_url: Option<String>,
    pub host_path: Option<PathBuf>,
    pub lock_wait: Option<u64>,
    pub container: Option<String>,
    pub overleaf_path: Option<String>,
    pub timeout: Option<u64>,
}

impl Overrides {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            mongo_url: cli.mongo_url.clone(),
            host_path: cli.host_path.clone(),
            lock_wait: cli.lock_wait,
            ..Self::default()
        }
    }

    pub fn with_export(
        mut self,
        container: Option<String>,
        overleaf_path: Option<String>,
        timeout: Option<u64>,
    ) -> Self {
        self.container = container;
        self.overleaf_path = overleaf_path;
        self.timeout = timeout;
        self
    }

    fn apply(&self, mut config: BackupConfig) -> BackupConfig {
        if let Some(v) = &self.mongo_url {
            config.mongo_url = Some(v.clone());
        }
        if let Some(v) = &self.host_path {
            config.host_path = v.clone();
        }
        if let Some(v) = self.lock_wait {
            config.lock_wait_secs = v;
        }
        if let Some(v) = &self.container {
            config.container_name = Some(v.clone());
        }
        if let Some(v) = &self.overleaf_path {
            config.overleaf_path = v.clone();
        }
        if let Some(v) = self.timeout {
            config.export_timeout_secs = v;
        }
        config
    }
}

/// Defaults, then the settings file, then the environment, then flags.
pub fn load_config(file: Option<&Path>, overrides: &Overrides) -> Result<BackupConfig> {
    let base = match file {
        Some(path) => BackupConfig::from_file(path)?,
        None => BackupConfig::default(),
    };
    let config = overrides.apply(base.with_process_env());
    tracing::debug!(host_path = %config.host_path.display(), "Configuration loaded");
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First seven characters of a commit id.
fn short(id: &str) -> &str {
    id.get(..7).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("gitbackup.toml");
        std::fs::write(&file, "container_name = \"from-file\"\nlock_wait_secs = 9\n").unwrap();

        let overrides = Overrides {
            lock_wait: Some(1),
            ..Overrides::default()
        }
        .with_export(Some("from-flag".into()), None, Some(60));
        let config = load_config(Some(&file), &overrides).unwrap();

        assert_eq!(config.container_name.as_deref(), Some("from-flag"));
        assert_eq!(config.lock_wait_secs, 1);
        assert_eq!(config.export_timeout_secs, 60);
    }

    #[test]
    fn missing_config_file_is_a_configuration_error() {
        let err = load_config(Some(Path::new("/nonexistent/gitbackup.toml")), &Overrides::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn short_ids() {
        assert_eq!(short("0123456789abcdef"), "0123456");
        assert_eq!(short("abc"), "abc");
    }
}
