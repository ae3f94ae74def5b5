//! Error type for logfeat-core.
//!
//! Per-line problems (unmatched formats, invalid records, bad timestamps) are
//! never errors: they are counted in the conversion and aggregation reports.
//! This enum only covers failures that abort a whole batch.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input file or directory does not exist.
    #[error("missing input: {}", .0.display())]
    MissingInput(PathBuf),

    /// The input directory exists but holds no partitions to convert.
    #[error("no *.{extension} files found in {}", .dir.display())]
    NoPartitions { dir: PathBuf, extension: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Window sizes must be a positive whole number of seconds.
    #[error("invalid window size: {0}s")]
    InvalidWindow(i64),

    /// Accumulators from passes with different window sizes cannot merge.
    #[error("cannot merge a {other}s aggregation into a {this}s aggregation")]
    WindowMismatch { this: i64, other: i64 },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
