//! Turns raw log lines into [`CanonicalLogRecord`] values.
//!
//! Matchers are attempted in the fixed order of [`LogFormat::ALL`]:
//! JSON object → node style → DELIVERY style → spring style. The first
//! matcher that accepts a line wins; a line no matcher accepts is a
//! dispatch miss. Nothing in here panics or returns an error for bad input.

pub mod matchers;
pub mod schema;
pub mod timestamp;

use crate::filter;
use crate::types::{CanonicalLogRecord, FieldBag, LogFormat, RawLine};

/// Try every matcher in priority order and return the first extraction.
pub fn dispatch(line: &str) -> Option<FieldBag> {
    if line.trim().is_empty() {
        return None;
    }
    LogFormat::ALL.iter().find_map(|format| format.extract(line))
}

/// A line that made it through a matcher and the schema normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub record: CanonicalLogRecord,
    pub format: LogFormat,
    /// The line carried an embedded payload that failed to decode; the
    /// record was built from whatever else the line held.
    pub payload_malformed: bool,
}

/// What happened to one raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Valid canonical record, ready for the store.
    Accepted(Converted),
    /// No matcher accepted the line.
    Unparseable,
    /// A matcher accepted the line but the record failed the validity filter.
    Invalid(Converted),
}

/// Run one raw line through dispatch, normalization and the validity filter.
pub fn convert_line(raw: &RawLine) -> LineOutcome {
    let Some(bag) = dispatch(&raw.text) else {
        return LineOutcome::Unparseable;
    };
    let converted = Converted {
        record: schema::normalize(&bag, &raw.default_service),
        format: bag.format,
        payload_malformed: bag.payload_malformed,
    };
    if filter::is_valid(&converted.record) {
        LineOutcome::Accepted(converted)
    } else {
        LineOutcome::Invalid(converted)
    }
}
