//! Schema normalizer: maps any [`FieldBag`] onto [`CanonicalLogRecord`].
//!
//! Every canonical field is resolved through one ordered alias chain. A
//! chain entry names either a top-level key of the bag or a key inside one of
//! its nested payloads; the first entry holding a present, non-empty value
//! wins. The same chains serve every matcher.

use super::timestamp;
use crate::types::{CanonicalLogRecord, FieldBag};
use regex::Regex;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Length of the hex digest prefix kept as `stacktrace_hash`.
pub const STACK_HASH_LEN: usize = 12;

#[derive(Debug, Clone, Copy)]
enum Source {
    Top(&'static str),
    Nested(&'static str),
}

use Source::{Nested, Top};

const TIMESTAMP: &[Source] = &[Top("timestamp"), Top("ts"), Top("@timestamp"), Top("time")];
const SERVICE: &[Source] = &[Top("service"), Top("svc"), Top("app")];
const LEVEL: &[Source] = &[Top("level"), Top("lvl"), Top("severity")];
const EVENT: &[Source] = &[Top("event"), Top("ev"), Top("message_type"), Top("msgType")];
const REQUEST_ID: &[Source] = &[
    Top("request_id"),
    Top("requestId"),
    Nested("requestId"),
    Nested("request_id"),
];
const SESSION_ID: &[Source] = &[
    Top("session_id"),
    Top("sessionId"),
    Nested("sessionId"),
    Nested("session_id"),
];
const METHOD: &[Source] = &[Top("method"), Nested("method")];
const PATH: &[Source] = &[Top("path"), Top("route"), Top("url"), Nested("path")];
const STATUS_CODE: &[Source] = &[
    Top("status_code"),
    Top("status"),
    Top("statusCode"),
    Nested("status_code"),
    Nested("status"),
    Nested("statusCode"),
];
const DURATION_MS: &[Source] = &[
    Top("duration_ms"),
    Top("durationMs"),
    Top("latency_ms"),
    Top("duration"),
    Nested("durationMs"),
    Nested("duration_ms"),
    Nested("duration"),
];
const ERROR_MESSAGE: &[Source] = &[
    Top("error_message"),
    Top("errorMessage"),
    Top("error"),
    Top("err"),
    Top("message"),
    Nested("error"),
];
const ERROR_TYPE: &[Source] = &[
    Top("error_type"),
    Top("errorType"),
    Top("exception"),
    Top("name"),
];
const STACK: &[Source] = &[Top("stack"), Top("stacktrace"), Top("trace"), Nested("stack")];
const STACKTRACE_HASH: &[Source] = &[Top("stacktrace_hash")];

fn error_type_re() -> &'static Regex {
    static ERROR_TYPE_RE: OnceLock<Regex> = OnceLock::new();
    ERROR_TYPE_RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_]+):").expect("valid error type regex"))
}

/// Build the canonical record for `bag`. `default_service` is used when
/// neither an alias nor the bag's own fallback names a service.
pub fn normalize(bag: &FieldBag, default_service: &str) -> CanonicalLogRecord {
    let stack = resolve(bag, STACK).and_then(text);

    let service = resolve(bag, SERVICE)
        .and_then(text)
        .or_else(|| bag.fallback_service.clone())
        .or_else(|| Some(default_service.to_string()).filter(|s| !s.is_empty()));

    CanonicalLogRecord {
        timestamp: resolve(bag, TIMESTAMP)
            .and_then(text)
            .map(|ts| timestamp::to_canonical(&ts)),
        service,
        level: resolve(bag, LEVEL).and_then(text).map(|l| l.to_uppercase()),
        event: resolve(bag, EVENT).and_then(text),
        request_id: resolve(bag, REQUEST_ID).and_then(text),
        session_id: resolve(bag, SESSION_ID).and_then(text),
        method: resolve(bag, METHOD).and_then(text),
        path: resolve(bag, PATH).and_then(text),
        status_code: resolve(bag, STATUS_CODE).and_then(integer),
        duration_ms: resolve(bag, DURATION_MS).and_then(float),
        error_message: resolve(bag, ERROR_MESSAGE).and_then(text),
        error_type: resolve(bag, ERROR_TYPE)
            .and_then(text)
            .or_else(|| stack.as_deref().and_then(error_type_from_stack)),
        stacktrace_hash: resolve(bag, STACKTRACE_HASH)
            .and_then(text)
            .or_else(|| stack.as_deref().map(stack_hash)),
    }
}

/// First present value along `chain`.
fn resolve<'a>(bag: &'a FieldBag, chain: &[Source]) -> Option<&'a Value> {
    chain.iter().find_map(|source| match *source {
        Top(key) => lookup(&bag.top, key),
        Nested(key) => bag.nested.iter().find_map(|obj| lookup(obj, key)),
    })
}

fn lookup<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| is_present(v))
}

/// `null`, `""`, `[]` and `{}` count as absent; `0` and `false` do not.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// String view of a value; scalars and containers are rendered as JSON text.
/// Empty strings become `None`.
pub(crate) fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(s).filter(|s| !s.is_empty())
}

/// Integer coercion that never fails loudly: invalid text yields `None`.
pub(crate) fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Float coercion; non-finite values are treated as missing.
pub(crate) fn float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    Some(f).filter(|f| f.is_finite())
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Truncated SHA-256 hex digest of a stack trace.
pub fn stack_hash(stack: &str) -> String {
    let mut hex = hex::encode(Sha256::digest(stack.as_bytes()));
    hex.truncate(STACK_HASH_LEN);
    hex
}

/// Leading `Identifier:` token of a stack trace, e.g. `TypeError` in
/// `TypeError: x is undefined`.
pub fn error_type_from_stack(stack: &str) -> Option<String> {
    error_type_re()
        .captures(stack.trim())
        .map(|caps| caps[1].to_string())
}
