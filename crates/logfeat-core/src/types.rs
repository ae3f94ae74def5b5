//! Core types shared by every logfeat layer.
//!
//! A [`RawLine`] enters the normalizer, a matcher turns it into a loosely
//! typed [`FieldBag`], and the schema layer folds the bag into the fixed
//! [`CanonicalLogRecord`] shape that the canonical store persists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The thirteen canonical keys, in the order they are written to the store.
pub const SCHEMA_KEYS: [&str; 13] = [
    "timestamp",
    "service",
    "level",
    "event",
    "request_id",
    "session_id",
    "method",
    "path",
    "status_code",
    "duration_ms",
    "error_message",
    "error_type",
    "stacktrace_hash",
];

/// One input line plus the service name implied by the partition it came
/// from (usually the file stem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub text: String,
    pub default_service: String,
}

impl RawLine {
    pub fn new(text: impl Into<String>, default_service: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            default_service: default_service.into(),
        }
    }
}

/// Producer conventions the dispatcher knows about, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// A whole-line JSON object.
    Json,
    /// `svc=... | level=... | ts=... | event=... | data={...}`
    Node,
    /// `DELIVERY|ts=...|lvl=...|ev=...|ctx={...}`
    Delivery,
    /// `2025-12-27 12:03:41.029 INFO  [svc] [thread] logger - message`
    Spring,
}

impl LogFormat {
    /// Every format, in the order the dispatcher tries them.
    pub const ALL: [LogFormat; 4] = [
        LogFormat::Json,
        LogFormat::Node,
        LogFormat::Delivery,
        LogFormat::Spring,
    ];
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Node => write!(f, "node"),
            LogFormat::Delivery => write!(f, "delivery"),
            LogFormat::Spring => write!(f, "spring"),
        }
    }
}

/// Loosely typed extraction result of a single matcher.
///
/// `top` holds the keys the producer wrote at the outer level of the line,
/// `nested` the decoded structured payloads (`ctx`, `data`, `metadata`) in
/// the order they should be consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBag {
    pub format: LogFormat,
    pub top: Map<String, Value>,
    pub nested: Vec<Map<String, Value>>,
    /// Overrides the partition default when no service alias is present.
    pub fallback_service: Option<String>,
    /// An embedded payload was present but could not be decoded.
    pub payload_malformed: bool,
}

impl FieldBag {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            top: Map::new(),
            nested: Vec::new(),
            fallback_service: None,
            payload_malformed: false,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.top.insert(key.into(), value.into());
    }
}

/// The fixed-schema output unit.
///
/// Every field is serialized, including nulls, so each line of the canonical
/// store carries exactly [`SCHEMA_KEYS`] regardless of the source format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLogRecord {
    pub timestamp: Option<String>,
    pub service: Option<String>,
    pub level: Option<String>,
    pub event: Option<String>,
    pub request_id: Option<String>,
    pub session_id: Option<String>,
    pub method: Option<String>,
    pub path: Option<String>,
    pub status_code: Option<i64>,
    pub duration_ms: Option<f64>,
    pub error_message: Option<String>,
    pub error_type: Option<String>,
    pub stacktrace_hash: Option<String>,
}

impl CanonicalLogRecord {
    /// Service name used for grouping; records without one share `unknown`.
    pub fn service_or_unknown(&self) -> &str {
        match self.service.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "unknown",
        }
    }
}
