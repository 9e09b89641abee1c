//! The export command line run inside the container

use std::time::Duration;

/// Directory of the platform's web service inside the container.
pub const DEFAULT_WEB_DIR: &str = "/overleaf/services/web";

/// Export script, relative to the web service directory.
pub const DEFAULT_EXPORT_SCRIPT: &str = "modules/server-ce-scripts/scripts/export-user-projects.mjs";

/// One project export: who asked, which project, where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub user_id: String,
    pub project_id: String,
    /// Directory inside the container the archive is written to
    pub remote_dir: String,
}

impl ExportRequest {
    pub fn new(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        remote_dir: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: project_id.into(),
            remote_dir: remote_dir.into(),
        }
    }

    /// `<user>_<project>.zip`
    pub fn archive_name(&self) -> String {
        format!("{}_{}.zip", self.user_id, self.project_id)
    }

    /// Full path of the archive inside the container.
    pub fn remote_path(&self) -> String {
        let dir = self.remote_dir.trim_end_matches('/');
        format!("{}/{}", dir, self.archive_name())
    }
}

/// How the export script is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCommand {
    pub web_dir: String,
    pub script: String,
    /// Upper bound on how long the export may run
    pub deadline: Duration,
}

impl ExportCommand {
    /// The single shell line run for `request`.
    pub fn shell_line(&self, request: &ExportRequest) -> String {
        format!(
            "cd {} && node {} --project-id {} --output {}",
            quote(&self.web_dir),
            quote(&self.script),
            quote(&request.project_id),
            quote(&request.remote_path()),
        )
    }

    /// Argument vector handed to the container runtime.
    pub fn argv(&self, request: &ExportRequest) -> Vec<String> {
        vec![
            "/bin/bash".to_string(),
            "-c".to_string(),
            self.shell_line(request),
        ]
    }
}

impl Default for ExportCommand {
    fn default() -> Self {
        Self {
            web_dir: DEFAULT_WEB_DIR.to_string(),
            script: DEFAULT_EXPORT_SCRIPT.to_string(),
            deadline: Duration::from_secs(3600),
        }
    }
}

/// Single-quote `value` for a POSIX shell.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("/var/lib/overleaf/")]
    #[case("/var/lib/overleaf")]
    fn remote_path_joins_archive_name(#[case] dir: &str) {
        let request = ExportRequest::new("U1", "P1", dir);
        assert_eq!(request.archive_name(), "U1_P1.zip");
        assert_eq!(request.remote_path(), "/var/lib/overleaf/U1_P1.zip");
    }

    #[test]
    fn shell_line_passes_project_and_output() {
        let request = ExportRequest::new("U1", "P1", "/var/lib/overleaf");
        let line = ExportCommand::default().shell_line(&request);
        assert_eq!(
            line,
            "cd '/overleaf/services/web' && node \
             'modules/server-ce-scripts/scripts/export-user-projects.mjs' \
             --project-id 'P1' --output '/var/lib/overleaf/U1_P1.zip'"
        );
    }

    #[test]
    fn argv_wraps_line_in_bash() {
        let request = ExportRequest::new("U1", "P1", "/tmp");
        let argv = ExportCommand::default().argv(&request);
        assert_eq!(argv[..2], ["/bin/bash".to_string(), "-c".to_string()]);
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(quote("it's"), r"'it'\''s'");
    }
}
