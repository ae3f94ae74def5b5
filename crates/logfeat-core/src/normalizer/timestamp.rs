//! Timestamp normalization.
//!
//! Two flavours exist. [`to_canonical`] is the lenient rewrite applied before
//! a record is stored: it only reshapes the two space-separated spellings and
//! otherwise leaves the text alone. [`parse_instant`] is the strict parse used
//! by aggregation, which needs a real UTC instant to bucket on.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};

const SPACED_WITH_FRACTION: &str = "%Y-%m-%d %H:%M:%S%.f";
const SPACED: &str = "%Y-%m-%d %H:%M:%S";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Best-effort ISO-8601 rewrite for the canonical store.
///
/// Text containing a `T` passes through untouched. `YYYY-MM-DD HH:MM:SS[.f]`
/// becomes `YYYY-MM-DDTHH:MM:SS[.ffffff]`. Anything else passes through
/// unvalidated.
pub fn to_canonical(raw: &str) -> String {
    let s = raw.trim();
    if s.contains('T') {
        return s.to_string();
    }
    [SPACED_WITH_FRACTION, SPACED]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(iso_naive)
        .unwrap_or_else(|| s.to_string())
}

/// Render a naive timestamp the way ISO consumers expect: microseconds only
/// when there is a sub-second component.
fn iso_naive(dt: NaiveDateTime) -> String {
    if dt.nanosecond() / 1_000 == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Strict parse into a UTC instant.
///
/// A trailing `Z` means `+00:00`; timestamps without an offset are taken to
/// be UTC. Returns `None` for anything that is not a recognisable instant.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = match s.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => s.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&s, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
    {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
