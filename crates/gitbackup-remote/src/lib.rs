//! Remote export execution for gitbackup
//!
//! The platform runs as a container; exports are produced by running the
//! platform's own export script inside it and copying the result out.
//! [`ExportRuntime`] is the seam, [`DockerRuntime`] the implementation.

pub mod command;
pub mod docker;
pub mod error;
pub mod runtime;

pub use command::{ExportCommand, ExportRequest};
pub use docker::DockerRuntime;
pub use error::{Error, Result};
pub use runtime::{ArchiveStream, ExportRuntime, RemoteTarget};
