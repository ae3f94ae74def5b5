//! Canonical store codec. Newline-delimited JSON, one record per line.
//!
//! Writing goes through `serde` so every line carries all thirteen keys.
//! Reading is lenient: values are re-coerced with the same rules the schema
//! normalizer uses, and lines that are not JSON objects are counted and
//! skipped rather than failing the read.

use crate::normalizer::schema::{float, integer, text};
use crate::types::CanonicalLogRecord;
use serde_json::{Map, Value};
use std::io::{BufRead, Write};

/// Serialize one record as a single JSONL line (newline included).
pub fn write_record<W: Write>(out: &mut W, record: &CanonicalLogRecord) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")
}

/// Decode one stored line. `None` means the line is not a JSON object.
pub fn decode_line(line: &str) -> Option<CanonicalLogRecord> {
    let obj: Map<String, Value> = serde_json::from_str(line.trim()).ok()?;
    let field = |key: &str| obj.get(key).filter(|v| !v.is_null());

    Some(CanonicalLogRecord {
        timestamp: field("timestamp").and_then(text),
        service: field("service").and_then(text),
        level: field("level").and_then(text),
        event: field("event").and_then(text),
        request_id: field("request_id").and_then(text),
        session_id: field("session_id").and_then(text),
        method: field("method").and_then(text),
        path: field("path").and_then(text),
        status_code: field("status_code").and_then(integer),
        duration_ms: field("duration_ms").and_then(float),
        error_message: field("error_message").and_then(text),
        error_type: field("error_type").and_then(text),
        stacktrace_hash: field("stacktrace_hash").and_then(text),
    })
}

/// Result of reading a whole canonical store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreBatch {
    pub records: Vec<CanonicalLogRecord>,
    /// Non-blank lines that did not decode as a JSON object.
    pub malformed_rows: u64,
}

/// Read every record from a canonical store.
pub fn read_records<R: BufRead>(reader: R) -> std::io::Result<StoreBatch> {
    let mut batch = StoreBatch::default();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(&line) {
            Some(record) => batch.records.push(record),
            None => {
                batch.malformed_rows += 1;
                tracing::trace!(%line, "skipping malformed canonical row");
            }
        }
    }
    Ok(batch)
}
