//! Test builders: ergonomic constructors for canonical records and raw
//! partition directories.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use logfeat_core::{CanonicalLogRecord, RawLine};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// RecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`CanonicalLogRecord`] fixtures.
///
/// # Example
///
/// ```rust
/// let record = RecordBuilder::new("2025-01-01T00:00:30Z", "svc-a")
///     .level("ERROR")
///     .event("http.request.completed")
///     .status(503)
///     .duration(12000.0)
///     .build();
/// ```
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: CanonicalLogRecord,
}

#[allow(dead_code)]
impl RecordBuilder {
    pub fn new(timestamp: &str, service: &str) -> Self {
        Self {
            record: CanonicalLogRecord {
                timestamp: Some(timestamp.to_string()),
                service: Some(service.to_string()),
                level: Some("INFO".to_string()),
                ..Default::default()
            },
        }
    }

    pub fn level(mut self, level: &str) -> Self {
        self.record.level = Some(level.to_string());
        self
    }

    pub fn event(mut self, event: &str) -> Self {
        self.record.event = Some(event.to_string());
        self
    }

    pub fn status(mut self, status: i64) -> Self {
        self.record.status_code = Some(status);
        self
    }

    pub fn duration(mut self, ms: f64) -> Self {
        self.record.duration_ms = Some(ms);
        self
    }

    pub fn no_service(mut self) -> Self {
        self.record.service = None;
        self
    }

    pub fn build(self) -> CanonicalLogRecord {
        self.record
    }
}

/// Raw lines tagged with one default service.
#[allow(dead_code)]
pub fn raw_lines<S: AsRef<str>>(service: &str, lines: &[S]) -> Vec<RawLine> {
    lines
        .iter()
        .map(|l| RawLine::new(l.as_ref(), service))
        .collect()
}

// ---------------------------------------------------------------------------
// Raw partition directories
// ---------------------------------------------------------------------------

/// A temp directory laid out like a conversion workspace: `raw/` for
/// partitions, everything else written next to it.
#[allow(dead_code)]
pub struct Workspace {
    pub dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("raw")).unwrap();
        Self { dir }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.dir.path().join("raw")
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write `raw/<name>` with one line per entry.
    pub fn partition<S: AsRef<str>>(&self, name: &str, lines: &[S]) -> &Self {
        let body: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();
        std::fs::write(self.raw_dir().join(name), body.join("\n") + "\n").unwrap();
        self
    }

    pub fn read(&self, relative: &str) -> String {
        read_to_string(&self.path(relative))
    }
}

#[allow(dead_code)]
pub fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}
