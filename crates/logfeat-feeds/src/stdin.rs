//! Standard input as a single partition.

use crate::Partition;
use logfeat_core::{Error, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Partition name used for stdin in conversion reports.
pub const STDIN_NAME: &str = "<stdin>";

/// Read all of stdin, attributing every line to `service`.
pub async fn read_stdin(service: &str) -> Result<Partition> {
    read_from(tokio::io::stdin(), service).await
}

/// Read a whole stream as one partition.
pub async fn read_from<R>(mut reader: R, service: &str) -> Result<Partition>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| Error::io(STDIN_NAME, e))?;
    let partition = Partition::from_text(STDIN_NAME, service, &String::from_utf8_lossy(&bytes));
    tracing::debug!(%service, lines = partition.lines.len(), "read stdin");
    Ok(partition)
}
