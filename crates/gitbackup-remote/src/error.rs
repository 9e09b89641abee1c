//! Error types for gitbackup-remote

use std::time::Duration;

/// Result type for gitbackup-remote operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitbackup-remote operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Container runtime error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("No running container named '{name}'")]
    ContainerNotFound { name: String },

    #[error("{count} running containers match '{name}', expected exactly one")]
    AmbiguousContainer { name: String, count: usize },

    #[error("Export command exited with code {exit_code}: {output}")]
    ExportFailed { exit_code: i64, output: String },

    #[error("Export command did not report an exit code")]
    ExitCodeUnavailable,

    #[error("Export command exceeded its deadline of {deadline:?}")]
    Timeout { deadline: Duration },

    #[error("Archive transfer from {path} failed: {message}")]
    Transfer { path: String, message: String },
}

impl Error {
    /// True for failures of moving bytes out of the container, as opposed
    /// to failures of locating it or running the export.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer { .. })
    }
}
