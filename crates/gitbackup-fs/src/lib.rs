//! Filesystem layer for gitbackup
//!
//! Resolves where each workspace lives, clears stale snapshot content while
//! keeping the history directory, and serializes concurrent runs against the
//! same workspace with an advisory lock.

pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod lock;
pub mod path;
pub mod permissions;
pub mod sanitize;

pub use constants::WorkspacePath;
pub use error::{Error, Result};
pub use layout::BackupLayout;
pub use lock::WorkspaceLock;
pub use path::{NormalizedPath, validate_path_component};
pub use sanitize::clean_except_history;
