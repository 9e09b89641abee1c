//! Advisory per-workspace locking
//!
//! Two runs for the same (identity, project) pair would otherwise sanitize
//! and unpack into the same directory and race on the commit. The lock is
//! an `fs2` exclusive lock on a file beside the workspace, retried with
//! exponential backoff until the configured wait runs out.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::layout::lock_path_for;
use crate::{Error, NormalizedPath, Result};

/// Upper bound on the delay between two lock attempts
const MAX_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// An exclusive lock on one workspace, released on drop.
#[derive(Debug)]
pub struct WorkspaceLock {
    file: File,
    path: PathBuf,
}

impl WorkspaceLock {
    /// Acquire the lock for `workspace`, waiting at most `wait`.
    ///
    /// The parent directory of the workspace must already exist. Returns
    /// [`Error::WorkspaceBusy`] if another holder keeps the lock past `wait`.
    pub fn acquire(workspace: &NormalizedPath, wait: Duration) -> Result<Self> {
        let lock_path = lock_path_for(workspace).to_native();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;

        let started = Instant::now();
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(50))
            .with_max_interval(MAX_RETRY_INTERVAL)
            .with_max_elapsed_time(Some(wait))
            .build();

        let attempt = || {
            file.try_lock_exclusive().map_err(|e| {
                if is_contended(&e) {
                    backoff::Error::transient(e)
                } else {
                    backoff::Error::permanent(e)
                }
            })
        };

        match backoff::retry(policy, attempt) {
            Ok(()) => {
                tracing::debug!(lock = %lock_path.display(), "Workspace lock acquired");
                Ok(Self {
                    file,
                    path: lock_path,
                })
            }
            Err(backoff::Error::Transient { .. }) => Err(Error::WorkspaceBusy {
                path: workspace.to_native(),
                waited: started.elapsed(),
            }),
            Err(backoff::Error::Permanent(e)) => Err(Error::io(&lock_path, e)),
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for WorkspaceLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(lock = %self.path.display(), error = %e, "Failed to release workspace lock");
        }
    }
}

fn is_contended(e: &io::Error) -> bool {
    e.kind() == fs2::lock_contended_error().kind() || e.kind() == io::ErrorKind::WouldBlock
}
