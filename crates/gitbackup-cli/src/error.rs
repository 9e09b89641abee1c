//! Error types for gitbackup-cli

use serde::Serialize;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// `EX_IOERR`, for failures writing our own output
const OUTPUT_EXIT_CODE: i32 = 74;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from gitbackup-core
    #[error(transparent)]
    Core(#[from] gitbackup_core::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) => e.exit_code(),
            Self::Json(_) => OUTPUT_EXIT_CODE,
        }
    }

    /// Machine-readable form printed under `--json`.
    pub fn report(&self) -> ErrorReport {
        let (kind, retryable) = match self {
            Self::Core(e) => (e.kind().as_str(), e.kind().is_retryable()),
            Self::Json(_) => ("output", false),
        };
        ErrorReport {
            error: kind,
            message: self.to_string(),
            retryable,
            exit_code: self.exit_code(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub error: &'static str,
    pub message: String,
    pub retryable: bool,
    pub exit_code: i32,
}
