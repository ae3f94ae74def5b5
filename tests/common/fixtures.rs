//! Static log corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of representative lines for
//! one producer convention. [`synthetic_lines`] builds a large mixed corpus
//! at test time for throughput and merge tests.

/// Whole-line JSON objects using the various alias spellings.
#[allow(dead_code)]
pub const CORPUS_JSON: &[&str] = &[
    r#"{"timestamp":"2025-01-01T00:00:30Z","service":"svc-a","level":"ERROR","event":"http.request.completed","status_code":503,"duration_ms":12000}"#,
    r#"{"ts":"2025-01-01T00:00:31Z","svc":"svc-a","lvl":"info","ev":"http.request.received","requestId":"r-1","method":"GET","route":"/orders"}"#,
    r#"{"@timestamp":"2025-01-01 00:00:32.500","app":"svc-b","severity":"warn","message_type":"cache.miss","latency_ms":"17.5"}"#,
    r#"{"time":"2025-01-01T00:00:33Z","service":"svc-b","msgType":"job.done","ctx":{"sessionId":"s-7","statusCode":"404","durationMs":8}}"#,
    r#"{"timestamp":"2025-01-01T00:00:34Z","service":"svc-c","level":"error","error":"db down","exception":"DbError","metadata":{"request_id":"r-2"}}"#,
];

/// Pipe-delimited `key=value` segments with a `data={...}` payload.
#[allow(dead_code)]
pub const CORPUS_NODE: &[&str] = &[
    r#"svc=orders | level=error | ts=2025-01-01T00:00:40Z | event=http.request.completed | data={"requestId":"r-9","method":"POST","path":"/orders","status":502,"durationMs":340,"error":"boom","stack":"TypeError: x is undefined\n    at handler (orders.js:12:5)"}"#,
    r#"svc=orders | level=info | ts=2025-01-01T00:00:41Z | event=http.request.received | data={"requestId":"r-10","method":"GET","path":"/orders/1"}"#,
    "svc=orders | level=info | ts=2025-01-01T00:00:42Z | event=worker.tick",
];

/// `DELIVERY|...` lines, some with noise before the marker or after `ctx`.
#[allow(dead_code)]
pub const CORPUS_DELIVERY: &[&str] = &[
    r#"DELIVERY|ts=2025-01-01T00:00:00Z|lvl=info|ev=delivery.created|ctx={"requestId":"abc","status":201}"#,
    r#"[pod-3] DELIVERY|ts=2025-01-01T00:00:50Z|lvl=error|ev=delivery.failed|ctx={"requestId":"def","statusCode":500,"duration":15000} (retrying)"#,
    r#"DELIVERY|ts=2025-01-01T00:00:51Z|lvl=warn|ev=delivery.delayed|ctx=not-json"#,
];

/// Spring-style positional text.
#[allow(dead_code)]
pub const CORPUS_SPRING: &[&str] = &[
    "2025-12-27 12:03:41.029 INFO  [users-service] [main] com.x.Y - Started",
    "2025-12-27 12:03:42.100 ERROR [users-service] [http-nio-8080-exec-1] c.x.UserController - Lookup failed, id=42",
    "2025-12-27 12:03:43.000 DEBUG [billing] [scheduler-1] c.x.Billing - tick",
];

/// Lines no matcher accepts.
#[allow(dead_code)]
pub const CORPUS_UNPARSEABLE: &[&str] = &[
    "",
    "   ",
    "plain text with no structure at all",
    "GET /api/v1/users 200 47ms",
    "{truncated json",
    "12:03:41 INFO [svc] missing date",
];

/// Lines a matcher accepts but the validity filter rejects.
#[allow(dead_code)]
pub const CORPUS_INVALID: &[&str] = &[
    // no timestamp
    r#"{"service":"svc-a","level":"INFO","event":"e"}"#,
    // no event, level, or error message
    r#"{"timestamp":"2025-01-01T00:00:00Z","service":"svc-a","path":"/x"}"#,
];

/// Every corpus above, interleaved.
#[allow(dead_code)]
pub fn corpus_mixed() -> Vec<&'static str> {
    let corpora = [
        CORPUS_JSON,
        CORPUS_NODE,
        CORPUS_DELIVERY,
        CORPUS_SPRING,
        CORPUS_UNPARSEABLE,
        CORPUS_INVALID,
    ];
    let longest = corpora.iter().map(|c| c.len()).max().unwrap_or(0);
    (0..longest)
        .flat_map(|i| corpora.iter().filter_map(move |c| c.get(i).copied()))
        .collect()
}

/// `n` well-formed lines spread over three services and ten minutes,
/// cycling through every accepted format.
#[allow(dead_code)]
pub fn synthetic_lines(n: usize) -> Vec<String> {
    let services = ["api", "orders", "billing"];
    (0..n)
        .map(|i| {
            let svc = services[i % services.len()];
            let minute = (i / 7) % 10;
            let second = (i * 13) % 60;
            let status = [200, 201, 404, 500, 503][i % 5];
            let duration = (i % 97) as f64 * 3.5;
            match i % 4 {
                0 => format!(
                    r#"{{"timestamp":"2025-01-01T00:{minute:02}:{second:02}Z","service":"{svc}","level":"INFO","event":"http.request.completed","status_code":{status},"duration_ms":{duration}}}"#
                ),
                1 => format!(
                    r#"svc={svc} | level=info | ts=2025-01-01T00:{minute:02}:{second:02}Z | event=http.request.received | data={{"requestId":"r-{i}"}}"#
                ),
                2 => format!(
                    r#"DELIVERY|ts=2025-01-01T00:{minute:02}:{second:02}Z|lvl=info|ev=delivery.created|ctx={{"status":{status},"durationMs":{duration}}}"#
                ),
                _ => format!(
                    "2025-01-01 00:{minute:02}:{second:02}.250 WARN  [{svc}] [main] c.x.Job - step {i}"
                ),
            }
        })
        .collect()
}
