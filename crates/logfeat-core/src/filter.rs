//! Validity filter for canonical records.

use crate::types::CanonicalLogRecord;

/// A record is kept when it has a timestamp, a service, and at least one of
/// `event`, `level` or `error_message`.
pub fn is_valid(record: &CanonicalLogRecord) -> bool {
    let has = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());

    has(&record.timestamp)
        && has(&record.service)
        && (has(&record.event) || has(&record.level) || has(&record.error_message))
}
