//! [`FakeRuntime`]: an export runtime that serves prepared archives.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use gitbackup_remote::{
    ArchiveStream, Error, ExportRequest, ExportRuntime, RemoteTarget, Result,
};

use crate::archive;

/// A call observed by [`FakeRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Locate,
    RunExport(ExportRequest),
    Fetch(String),
}

/// How the fake behaves when asked to locate, export or fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Everything succeeds
    Healthy,
    /// No running container matches
    NoContainer,
    /// Two running containers match
    AmbiguousContainer,
    /// The export exits with this code
    ExportExit(i64),
    /// The export never finishes within its deadline
    ExportTimeout,
    /// The stream breaks after the first chunk
    BrokenTransfer,
    /// The tar holds a file under the wrong name
    WrongInnerName,
}

/// Scripted stand-in for the container runtime.
///
/// On fetch it builds the two-layer artifact from its file list, naming the
/// inner zip after the requested remote path just like the real export.
pub struct FakeRuntime {
    files: Mutex<Vec<(String, Vec<u8>)>>,
    scenario: Mutex<Scenario>,
    chunk_size: usize,
    calls: Mutex<Vec<RuntimeCall>>,
    closed: AtomicUsize,
}

impl FakeRuntime {
    /// A healthy runtime whose exports contain `files`.
    pub fn serving(files: &[(&str, &[u8])]) -> Self {
        Self {
            files: Mutex::new(
                files
                    .iter()
                    .map(|(p, c)| (p.to_string(), c.to_vec()))
                    .collect(),
            ),
            scenario: Mutex::new(Scenario::Healthy),
            chunk_size: 512,
            calls: Mutex::new(Vec::new()),
            closed: AtomicUsize::new(0),
        }
    }

    pub fn with_scenario(self, scenario: Scenario) -> Self {
        self.set_scenario(scenario);
        self
    }

    pub fn set_scenario(&self, scenario: Scenario) {
        *self.scenario.lock().unwrap() = scenario;
    }

    /// Replace the project content served by later exports.
    pub fn set_files(&self, files: &[(&str, &[u8])]) {
        *self.files.lock().unwrap() = files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_vec()))
            .collect();
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.lock().unwrap().clone()
    }

    /// True if an export was attempted.
    pub fn exported(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| matches!(c, RuntimeCall::RunExport(_)))
    }

    /// True if an archive was fetched.
    pub fn fetched(&self) -> bool {
        self.calls().iter().any(|c| matches!(c, RuntimeCall::Fetch(_)))
    }

    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, call: RuntimeCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn scenario(&self) -> Scenario {
        self.scenario.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExportRuntime for FakeRuntime {
    async fn locate(&self) -> Result<RemoteTarget> {
        self.record(RuntimeCall::Locate);
        match self.scenario() {
            Scenario::NoContainer => Err(Error::ContainerNotFound {
                name: "sharelatex".to_string(),
            }),
            Scenario::AmbiguousContainer => Err(Error::AmbiguousContainer {
                name: "sharelatex".to_string(),
                count: 2,
            }),
            _ => Ok(RemoteTarget {
                id: "fake-container".to_string(),
                name: "sharelatex".to_string(),
            }),
        }
    }

    async fn run_export(&self, _target: &RemoteTarget, request: &ExportRequest) -> Result<()> {
        self.record(RuntimeCall::RunExport(request.clone()));
        match self.scenario() {
            Scenario::ExportExit(code) if code != 0 => Err(Error::ExportFailed {
                exit_code: code,
                output: "Error: project not found".to_string(),
            }),
            Scenario::ExportTimeout => Err(Error::Timeout {
                deadline: Duration::from_secs(1),
            }),
            _ => Ok(()),
        }
    }

    async fn fetch_archive(&self, _target: &RemoteTarget, remote_path: &str) -> Result<ArchiveStream> {
        self.record(RuntimeCall::Fetch(remote_path.to_string()));
        let scenario = self.scenario();

        let inner_name = match scenario {
            Scenario::WrongInnerName => "unexpected.zip".to_string(),
            _ => remote_path
                .rsplit('/')
                .next()
                .unwrap_or(remote_path)
                .to_string(),
        };
        let files = self.files.lock().unwrap().clone();
        let borrowed: Vec<(&str, &[u8])> = files
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_slice()))
            .collect();
        let bytes = archive::nested_archive(&inner_name, &borrowed);

        let mut chunks: Vec<Result<Bytes>> = bytes
            .chunks(self.chunk_size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if scenario == Scenario::BrokenTransfer {
            chunks.truncate(1);
            chunks.push(Err(Error::Transfer {
                path: remote_path.to_string(),
                message: "connection reset".to_string(),
            }));
        }
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
