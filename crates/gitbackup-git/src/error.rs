//! Error types for gitbackup-git

use std::path::PathBuf;

/// Result type for gitbackup-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitbackup-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("No snapshot history at {path}")]
    NoHistory { path: PathBuf },

    #[error("Invalid snapshot author '{name} <{email}>': {message}")]
    InvalidAuthor {
        name: String,
        email: String,
        message: String,
    },
}
