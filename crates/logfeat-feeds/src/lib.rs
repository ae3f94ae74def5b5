//! logfeat-feeds — raw line sources for logfeat.
//!
//! Each feed reads one or more input partitions and hands back
//! [`Partition`]s: a name for the conversion report plus the partition's
//! lines, each tagged with the partition's default service.

pub mod file;
pub mod stdin;

use logfeat_core::RawLine;
use std::path::PathBuf;

/// One input partition, fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub name: String,
    /// Default service of every line in the partition.
    pub service: String,
    pub lines: Vec<RawLine>,
}

impl Partition {
    /// Split `text` into lines, tagging each with `service`.
    pub fn from_text(name: impl Into<String>, service: &str, text: &str) -> Self {
        Self {
            name: name.into(),
            service: service.to_string(),
            lines: text.lines().map(|l| RawLine::new(l, service)).collect(),
        }
    }
}

/// Where raw lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// A single partition file, or a directory of `*.<extension>` partitions.
    Path { path: PathBuf, extension: String },
    /// Standard input, attributed to one service.
    Stdin { service: String },
}

impl FeedSource {
    /// Read every partition this source covers. Fails before yielding
    /// anything when the input is missing.
    pub async fn read(&self) -> logfeat_core::Result<Vec<Partition>> {
        match self {
            FeedSource::Path { path, extension } => {
                let files = file::discover(path, extension).await?;
                let mut partitions = Vec::with_capacity(files.len());
                for f in &files {
                    partitions.push(file::read_partition(f).await?);
                }
                Ok(partitions)
            }
            FeedSource::Stdin { service } => Ok(vec![stdin::read_stdin(service).await?]),
        }
    }
}
