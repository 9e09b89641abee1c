//! The remote execution seam

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::{ExportRequest, Result};

/// Byte chunks of a transport (tar) archive streamed out of the container.
pub type ArchiveStream = BoxStream<'static, Result<Bytes>>;

/// A located, running container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub id: String,
    pub name: String,
}

/// Runs exports inside the platform container and copies results out.
#[async_trait]
pub trait ExportRuntime: Send + Sync {
    /// Find the single running container this runtime is configured for.
    async fn locate(&self) -> Result<RemoteTarget>;

    /// Run the export script and wait for it to exit.
    ///
    /// Any nonzero exit, missing exit code or expired deadline is an error;
    /// nothing written by a failed export may be retrieved.
    async fn run_export(&self, target: &RemoteTarget, request: &ExportRequest) -> Result<()>;

    /// Stream `remote_path` out of the container, wrapped in a tar archive.
    async fn fetch_archive(&self, target: &RemoteTarget, remote_path: &str) -> Result<ArchiveStream>;

    /// Release the runtime connection.
    async fn close(&self) {}
}
