//! Builders for the export artifact: a tar archive wrapping a zip archive.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip `files` (path, content) in order.
///
/// Paths ending in `/` become directory entries.
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (path, content) in files {
        if path.ends_with('/') {
            writer.add_directory(*path, options).expect("zip directory");
        } else {
            writer.start_file(*path, options).expect("zip entry");
            writer.write_all(content).expect("zip write");
        }
    }
    writer.finish().expect("zip finish").into_inner()
}

/// Wrap `content` as the single file `name` of a tar archive, the way the
/// container runtime wraps a copied-out file.
pub fn tar_single(name: &str, content: &[u8]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, name, content)
        .expect("tar entry");
    builder.into_inner().expect("tar finish")
}

/// The full two-layer artifact: `inner_name` (a zip of `files`) inside a tar.
pub fn nested_archive(inner_name: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    tar_single(inner_name, &zip_bytes(files))
}
