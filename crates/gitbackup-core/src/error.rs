//! Error types for gitbackup-core

use std::path::PathBuf;

use serde::Serialize;

/// Result type for gitbackup-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure classes, each with its own exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Store address or container name missing or malformed
    Configuration,
    /// Caller input rejected before any lookup
    Validation,
    /// Identity absent from the store
    NotFound,
    /// No access relationship, or the access check could not be answered
    Unauthorized,
    /// The store could not be queried
    StoreUnavailable,
    /// Container absent or ambiguous, export failed or timed out
    RemoteExecution,
    /// I/O while moving or unpacking the archive or touching the workspace
    Transfer,
    /// Another run holds the workspace lock
    Busy,
    /// Initializing, staging or committing history failed
    VersionControl,
}

impl ErrorKind {
    /// Process exit status, following `sysexits.h`.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Validation => 65,
            Self::NotFound => 67,
            Self::StoreUnavailable => 69,
            Self::VersionControl => 73,
            Self::Transfer => 74,
            Self::Busy => 75,
            Self::RemoteExecution => 76,
            Self::Unauthorized => 77,
            Self::Configuration => 78,
        }
    }

    /// Whether running again later may succeed without operator action.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable | Self::RemoteExecution | Self::Transfer | Self::Busy
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::StoreUnavailable => "store_unavailable",
            Self::RemoteExecution => "remote_execution",
            Self::Transfer => "transfer",
            Self::Busy => "busy",
            Self::VersionControl => "version_control",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in gitbackup-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("No account found for '{identity}'")]
    IdentityNotFound { identity: String },

    #[error("'{identity}' has no access to project {project}")]
    Unauthorized { identity: String, project: String },

    /// The store failed while answering the access check. Treated as a
    /// denial, but kept apart from a genuine one.
    #[error("Access check for project {project} could not be completed, denying: {source}")]
    AccessCheckUnavailable {
        project: String,
        #[source]
        source: gitbackup_store::Error,
    },

    #[error("Failed to write archive to {path}: {source}")]
    Transfer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to unpack {path}: {message}")]
    Unpack { path: PathBuf, message: String },

    #[error(transparent)]
    Store(#[from] gitbackup_store::Error),

    #[error(transparent)]
    Remote(#[from] gitbackup_remote::Error),

    #[error(transparent)]
    Workspace(#[from] gitbackup_fs::Error),

    #[error(transparent)]
    History(#[from] gitbackup_git::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } | Self::ConfigParse(_) => ErrorKind::Configuration,
            Self::IdentityNotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } | Self::AccessCheckUnavailable { .. } => {
                ErrorKind::Unauthorized
            }
            Self::Transfer { .. } | Self::Unpack { .. } => ErrorKind::Transfer,
            Self::Store(e) => match e {
                gitbackup_store::Error::InvalidAddress { .. } => ErrorKind::Configuration,
                gitbackup_store::Error::InvalidProjectId { .. } => ErrorKind::Validation,
                _ => ErrorKind::StoreUnavailable,
            },
            Self::Remote(e) if e.is_transfer() => ErrorKind::Transfer,
            Self::Remote(_) => ErrorKind::RemoteExecution,
            Self::Workspace(e) => match e {
                gitbackup_fs::Error::WorkspaceBusy { .. } => ErrorKind::Busy,
                gitbackup_fs::Error::InvalidComponent { .. } => ErrorKind::Validation,
                _ => ErrorKind::Transfer,
            },
            Self::History(gitbackup_git::Error::NoHistory { .. }) => ErrorKind::NotFound,
            Self::History(_) => ErrorKind::VersionControl,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
