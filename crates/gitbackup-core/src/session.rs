//! One invocation's connections, released on every exit path.

use std::sync::Arc;

use gitbackup_remote::{DockerRuntime, ExportRuntime};
use gitbackup_store::{DocumentStore, MongoStore};

use crate::{BackupConfig, ExportReport, ListingReport, Pipeline, Result};

/// Owns the store (and, for exports, the container runtime) for a single
/// pipeline run. Each run method consumes the session and closes both
/// connections whether the run succeeded or not.
pub struct Session {
    config: BackupConfig,
    store: Arc<dyn DocumentStore>,
    runtime: Option<Arc<dyn ExportRuntime>>,
}

impl Session {
    pub fn new(config: BackupConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            config,
            store,
            runtime: None,
        }
    }

    pub fn with_runtime(mut self, runtime: Arc<dyn ExportRuntime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Connect to the document store only.
    pub async fn connect_for_listing(config: BackupConfig) -> Result<Self> {
        let address = config.store_address()?;
        let store = MongoStore::connect(&address).await?;
        tracing::debug!(host = %address.host, database = %address.database, "Connected to store");
        Ok(Self::new(config, Arc::new(store)))
    }

    /// Connect to the document store and the container runtime.
    ///
    /// Configuration is checked before either connection is attempted.
    pub async fn connect_for_export(config: BackupConfig) -> Result<Self> {
        let address = config.store_address()?;
        let container = config.container_name()?.to_string();

        let store = MongoStore::connect(&address).await?;
        let runtime = match DockerRuntime::connect(container, config.export_command()) {
            Ok(runtime) => runtime,
            Err(e) => {
                store.close().await;
                return Err(e.into());
            }
        };
        tracing::debug!(host = %address.host, database = %address.database, "Connected to store and runtime");

        Ok(Self::new(config, Arc::new(store)).with_runtime(Arc::new(runtime)))
    }

    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    pub async fn export_project(self, identity: &str, project: &str) -> Result<ExportReport> {
        let outcome = self.pipeline().export_project(identity, project).await;
        self.close().await;
        outcome
    }

    pub async fn snapshot_project_list(self, identity: &str) -> Result<ListingReport> {
        let outcome = self.pipeline().snapshot_project_list(identity).await;
        self.close().await;
        outcome
    }

    fn pipeline(&self) -> Pipeline<'_> {
        let pipeline = Pipeline::new(&self.config, self.store.as_ref());
        match &self.runtime {
            Some(runtime) => pipeline.with_runtime(runtime.as_ref()),
            None => pipeline,
        }
    }

    async fn close(self) {
        if let Some(runtime) = &self.runtime {
            runtime.close().await;
        }
        self.store.close().await;
        tracing::debug!("Session closed");
    }
}
