//! Format matchers, one pure function per producer convention.
//!
//! A matcher either accepts a line and returns the [`FieldBag`] it extracted,
//! or returns `None`. Matchers never consult each other; priority order lives
//! in [`LogFormat::ALL`] and is applied by the dispatcher.

use crate::types::{FieldBag, LogFormat};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Service assigned to lines carrying a bare `DELIVERY` segment.
pub const DELIVERY_SERVICE: &str = "delivery-service";

/// Event assigned to positional lines, which never name one.
pub const SPRING_EVENT: &str = "app.log";

const DELIVERY_MARKER: &str = "DELIVERY|";

fn spring_re() -> &'static Regex {
    static SPRING_RE: OnceLock<Regex> = OnceLock::new();
    SPRING_RE.get_or_init(|| {
        Regex::new(
            r"^(?P<date>\d{4}-\d{2}-\d{2})\s+(?P<time>\d{2}:\d{2}:\d{2}\.\d{3})\s+(?P<level>[A-Z]+)\s+\[(?P<service>[^\]]+)\]\s+\[(?P<thread>[^\]]+)\]\s+(?P<logger>\S+)\s+-\s+(?P<message>.*)$",
        )
        .expect("valid spring line regex")
    })
}

impl LogFormat {
    /// Run this format's matcher against `line`.
    pub fn extract(self, line: &str) -> Option<FieldBag> {
        match self {
            LogFormat::Json => match_json(line),
            LogFormat::Node => match_node(line),
            LogFormat::Delivery => match_delivery(line),
            LogFormat::Spring => match_spring(line),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON object
// ---------------------------------------------------------------------------

/// Whole-line JSON objects. A line that looks like an object but fails to
/// decode is not accepted, so later matchers still get a chance at it.
pub fn match_json(line: &str) -> Option<FieldBag> {
    let trimmed = line.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    let mut top: Map<String, Value> = serde_json::from_str(trimmed).ok()?;

    let mut bag = FieldBag::new(LogFormat::Json);
    for key in ["ctx", "metadata"] {
        if let Some(Value::Object(obj)) = top.remove(key) {
            bag.nested.push(obj);
        }
    }
    bag.top = top;
    Some(bag)
}

// ---------------------------------------------------------------------------
// Node style: svc=... | event=... | data={...}
// ---------------------------------------------------------------------------

pub fn match_node(line: &str) -> Option<FieldBag> {
    if !(line.contains("svc=") && line.contains("| event=")) {
        return None;
    }

    let mut bag = FieldBag::new(LogFormat::Node);
    for segment in line.split('|') {
        let Some((key, value)) = key_value(segment) else {
            continue;
        };
        if key == "data" {
            match decode_object(value) {
                Some(obj) => bag.nested.push(obj),
                None => bag.payload_malformed = true,
            }
        } else {
            bag.insert(key, value);
        }
    }
    Some(bag)
}

// ---------------------------------------------------------------------------
// DELIVERY|ts=...|lvl=...|ev=...|ctx={...}
// ---------------------------------------------------------------------------

/// Anything before the `DELIVERY|` marker is discarded, and the `ctx` value
/// may trail garbage after its closing brace.
pub fn match_delivery(line: &str) -> Option<FieldBag> {
    let start = line.find(DELIVERY_MARKER)?;

    let mut bag = FieldBag::new(LogFormat::Delivery);
    for segment in line[start..].split('|') {
        if segment.trim() == "DELIVERY" {
            bag.fallback_service = Some(DELIVERY_SERVICE.to_string());
            continue;
        }
        let Some((key, value)) = key_value(segment) else {
            continue;
        };
        if key == "ctx" {
            match first_object(value) {
                Some(obj) => bag.nested.push(obj),
                None => bag.payload_malformed = true,
            }
        } else {
            bag.insert(key, value);
        }
    }
    Some(bag)
}

// ---------------------------------------------------------------------------
// Spring style positional text
// ---------------------------------------------------------------------------

/// The timestamp is rebuilt as `<date>T<time>` with no offset attached.
pub fn match_spring(line: &str) -> Option<FieldBag> {
    let caps = spring_re().captures(line.trim())?;

    let mut bag = FieldBag::new(LogFormat::Spring);
    bag.insert("timestamp", format!("{}T{}", &caps["date"], &caps["time"]));
    bag.insert("service", &caps["service"]);
    bag.insert("level", &caps["level"]);
    bag.insert("event", SPRING_EVENT);
    bag.insert("error_message", &caps["message"]);
    Some(bag)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn key_value(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = segment.trim().split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn decode_object(text: &str) -> Option<Map<String, Value>> {
    serde_json::from_str(text).ok()
}

/// Decode the first complete JSON object starting at the first `{`,
/// ignoring whatever follows its closing brace.
fn first_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Map<String, Value>>()
        .next()?
        .ok()
}
