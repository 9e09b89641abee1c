//! Export-and-snapshot pipelines for gitbackup
//!
//! Two pipelines run against one identity per invocation:
//!
//! - **Project export**: resolve identity, check access, run the export in
//!   the platform container, stream the archive out, clear the workspace,
//!   unpack, commit a snapshot.
//! - **Project listing**: resolve identity, list accessible projects, write
//!   `projects.txt`, commit a snapshot.
//!
//! # Architecture
//!
//! ```text
//!                 gitbackup-cli
//!                       |
//!                 gitbackup-core
//!                       |
//!     +-----------+-----+------+-------------+
//!     |           |            |             |
//! gitbackup-fs gitbackup-git gitbackup-store gitbackup-remote
//! ```
//!
//! Any stage failure aborts the rest; [`Error::kind`] classifies it and
//! [`ErrorKind::exit_code`] gives the process exit status.

pub mod archive;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod session;

pub use config::BackupConfig;
pub use error::{Error, ErrorKind, Result};
pub use pipeline::Pipeline;
pub use report::{ExportReport, HistoryEntry, ListingReport};
pub use session::Session;
