//! Docker-backed export runtime

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{DownloadFromContainerOptions, ListContainersOptions};
use bollard::exec::{CreateExecOptions, StartExecResults};
use futures::{StreamExt, TryStreamExt};

use crate::{ArchiveStream, Error, ExportCommand, ExportRequest, ExportRuntime, RemoteTarget, Result};

/// Keep at most this much command output for error reports
const OUTPUT_TAIL_BYTES: usize = 4096;

/// Runs exports through the local Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerRuntime {
    docker: Docker,
    container_name: String,
    command: ExportCommand,
}

impl DockerRuntime {
    /// Connect to the daemon using the platform defaults (socket or
    /// `DOCKER_HOST`).
    pub fn connect(container_name: impl Into<String>, command: ExportCommand) -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self::with_client(docker, container_name, command))
    }

    pub fn with_client(
        docker: Docker,
        container_name: impl Into<String>,
        command: ExportCommand,
    ) -> Self {
        Self {
            docker,
            container_name: container_name.into(),
            command,
        }
    }

    async fn exec_and_wait(&self, target: &RemoteTarget, argv: Vec<String>) -> Result<(Option<i64>, String)> {
        let exec = self
            .docker
            .create_exec(
                &target.id,
                CreateExecOptions {
                    cmd: Some(argv),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        let mut output = String::new();
        if let StartExecResults::Attached {
            output: mut stream, ..
        } = self.docker.start_exec(&exec.id, None).await?
        {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk?.to_string();
                tracing::debug!(target: "gitbackup::export", "{}", chunk.trim_end());
                output.push_str(&chunk);
                if output.len() > OUTPUT_TAIL_BYTES * 2 {
                    let mut cut = output.len() - OUTPUT_TAIL_BYTES;
                    while !output.is_char_boundary(cut) {
                        cut += 1;
                    }
                    output.drain(..cut);
                }
            }
        }

        let inspect = self.docker.inspect_exec(&exec.id).await?;
        Ok((inspect.exit_code, output))
    }
}

#[async_trait]
impl ExportRuntime for DockerRuntime {
    async fn locate(&self) -> Result<RemoteTarget> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![self.container_name.clone()]);
        let options = ListContainersOptions::<String> {
            all: false,
            filters,
            ..Default::default()
        };

        // The name filter is a substring match; keep exact matches only
        let wanted = format!("/{}", self.container_name);
        let matches: Vec<_> = self
            .docker
            .list_containers(Some(options))
            .await?
            .into_iter()
            .filter(|c| {
                c.names
                    .as_ref()
                    .is_some_and(|names| names.iter().any(|n| *n == wanted))
            })
            .collect();

        match matches.as_slice() {
            [only] => {
                let target = RemoteTarget {
                    id: only.id.clone().unwrap_or_else(|| self.container_name.clone()),
                    name: self.container_name.clone(),
                };
                tracing::debug!(container = %target.name, id = %target.id, "Located container");
                Ok(target)
            }
            [] => Err(Error::ContainerNotFound {
                name: self.container_name.clone(),
            }),
            many => Err(Error::AmbiguousContainer {
                name: self.container_name.clone(),
                count: many.len(),
            }),
        }
    }

    async fn run_export(&self, target: &RemoteTarget, request: &ExportRequest) -> Result<()> {
        let argv = self.command.argv(request);
        let deadline = self.command.deadline;
        tracing::debug!(container = %target.name, project = %request.project_id, output = %request.remote_path(), "Starting export exec");

        let (exit_code, output) = tokio::time::timeout(deadline, self.exec_and_wait(target, argv))
            .await
            .map_err(|_| Error::Timeout { deadline })??;

        match exit_code {
            Some(0) => Ok(()),
            Some(code) => Err(Error::ExportFailed {
                exit_code: code,
                output: output.trim().to_string(),
            }),
            None => Err(Error::ExitCodeUnavailable),
        }
    }

    async fn fetch_archive(&self, target: &RemoteTarget, remote_path: &str) -> Result<ArchiveStream> {
        let options = DownloadFromContainerOptions {
            path: remote_path.to_string(),
        };
        let path = remote_path.to_string();
        let stream = self
            .docker
            .download_from_container(&target.id, Some(options))
            .map_err(move |e| Error::Transfer {
                path: path.clone(),
                message: e.to_string(),
            });
        Ok(stream.boxed())
    }
}
