//! Partition files on disk.
//!
//! A partition is one raw log file; its stem (`orders.log` → `orders`) is
//! the default service for every line in it. Bytes that are not valid UTF-8
//! are replaced rather than rejected, so one bad byte never drops a file.

use crate::Partition;
use logfeat_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Resolve `input` to the sorted list of partition files it names.
///
/// A file is its own single partition. A directory yields every
/// `*.<extension>` file directly inside it, in lexical order.
pub async fn discover(input: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let meta = match tokio::fs::metadata(input).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MissingInput(input.to_path_buf()));
        }
        Err(e) => return Err(Error::io(input, e)),
    };
    if meta.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut entries = tokio::fs::read_dir(input)
        .await
        .map_err(|e| Error::io(input, e))?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(input, e))? {
        let path = entry.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoPartitions {
            dir: input.to_path_buf(),
            extension: extension.to_string(),
        });
    }
    files.sort();
    tracing::debug!(dir = %input.display(), count = files.len(), "discovered partitions");
    Ok(files)
}

/// Default service for lines read from `path`.
pub fn service_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read one partition file in full.
pub async fn read_partition(path: &Path) -> Result<Partition> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
        _ => Error::io(path, e),
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partition = Partition::from_text(name, &service_for(path), &text);
    tracing::debug!(path = %path.display(), lines = partition.lines.len(), "read partition");
    Ok(partition)
}
