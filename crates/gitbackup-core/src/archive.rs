//! Landing and unwrapping the exported archive
//!
//! The container runtime hands back the export zip wrapped in a tar. Both
//! layers are unpacked into the workspace and both archive files removed,
//! so only the project's files (and `.git`) remain.

use std::fs::File;
use std::path::Path;

use futures::StreamExt;
use gitbackup_fs::NormalizedPath;
use gitbackup_remote::ArchiveStream;
use tokio::io::AsyncWriteExt;

use crate::{Error, Result};

/// Drain `stream` into `dest`, returning the number of bytes written.
pub async fn write_stream(mut stream: ArchiveStream, dest: &NormalizedPath) -> Result<u64> {
    let path = dest.to_native();
    let io_err = |source| Error::Transfer {
        path: path.clone(),
        source,
    };

    let mut file = tokio::fs::File::create(&path).await.map_err(io_err)?;
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;

    tracing::debug!(path = %dest, bytes = written, "Archive transferred");
    Ok(written)
}

/// Unpack the transport tar at `tar_path` into `workspace`, then the zip
/// named `inner_name` it carried. Both archive files are deleted. Returns
/// the number of regular files the zip held.
pub fn unwrap_export(workspace: &NormalizedPath, tar_path: &NormalizedPath, inner_name: &str) -> Result<usize> {
    unpack_tar(tar_path, workspace)?;
    remove(tar_path)?;

    let zip_path = workspace.join(inner_name);
    if !zip_path.to_native().is_file() {
        return Err(Error::Unpack {
            path: tar_path.to_native(),
            message: format!("archive did not contain {inner_name}"),
        });
    }

    let files = unpack_zip(&zip_path, workspace)?;
    remove(&zip_path)?;

    tracing::debug!(workspace = %workspace, files, "Export unpacked");
    Ok(files)
}

fn unpack_tar(tar_path: &NormalizedPath, into: &NormalizedPath) -> Result<()> {
    let path = tar_path.to_native();
    let file = open(&path)?;
    let mut archive = tar::Archive::new(file);
    archive.set_overwrite(true);
    archive.set_preserve_mtime(true);
    archive.unpack(into.to_native()).map_err(|e| Error::Unpack {
        path: path.clone(),
        message: e.to_string(),
    })
}

fn unpack_zip(zip_path: &NormalizedPath, into: &NormalizedPath) -> Result<usize> {
    let path = zip_path.to_native();
    let unpack_err = |e: zip::result::ZipError| Error::Unpack {
        path: path.clone(),
        message: e.to_string(),
    };

    let mut archive = zip::ZipArchive::new(open(&path)?).map_err(unpack_err)?;
    let files = archive.file_names().filter(|name| !name.ends_with('/')).count();
    archive.extract(into.to_native()).map_err(unpack_err)?;
    Ok(files)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| Error::Unpack {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn remove(path: &NormalizedPath) -> Result<()> {
    gitbackup_fs::io::remove_file(path)?;
    Ok(())
}
