//! Error types for gitbackup-store

/// Result type for gitbackup-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gitbackup-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid document store address: {message}")]
    InvalidAddress { message: String },

    #[error("Invalid project id '{id}': {message}")]
    InvalidProjectId { id: String, message: String },

    #[error("Malformed document in '{collection}': {message}")]
    MalformedDocument { collection: String, message: String },

    #[error("Document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Document store unavailable: {message}")]
    Unavailable { message: String },
}
