//! Error types for gitbackup-fs

use std::path::PathBuf;
use std::time::Duration;

/// Result type for gitbackup-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitbackup-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {what} '{value}': {reason}")]
    InvalidComponent {
        what: String,
        value: String,
        reason: String,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Backup of {path} already in progress (waited {waited:?})")]
    WorkspaceBusy { path: PathBuf, waited: Duration },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
