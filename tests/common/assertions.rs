//! Domain-specific assertion macros for logfeat harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! logfeat invariant was violated.

// ---------------------------------------------------------------------------
// Canonical store
// ---------------------------------------------------------------------------

/// Assert that one canonical store line is a JSON object carrying exactly
/// the thirteen schema keys.
///
/// ```rust
/// assert_schema_keys!(line);
/// ```
#[macro_export]
macro_rules! assert_schema_keys {
    ($line:expr) => {{
        let line: &str = $line;
        let value: serde_json::Value = serde_json::from_str(line)
            .unwrap_or_else(|e| panic!("assert_schema_keys! failed: not JSON ({e}): {line:?}"));
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap_or_else(|| panic!("assert_schema_keys! failed: not an object: {line:?}"))
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        let mut expected: Vec<&str> = logfeat_core::SCHEMA_KEYS.to_vec();
        expected.sort_unstable();
        pretty_assertions::assert_eq!(keys, expected, "canonical key set differs for {line:?}");
    }};
}

/// Convert one raw line and return the accepted record, panicking with the
/// actual outcome otherwise.
#[macro_export]
macro_rules! assert_accepted {
    ($text:expr) => {
        $crate::assert_accepted!($text, "partition")
    };
    ($text:expr, $service:expr) => {{
        let raw = logfeat_core::RawLine::new($text, $service);
        match logfeat_core::normalizer::convert_line(&raw) {
            logfeat_core::normalizer::LineOutcome::Accepted(converted) => converted.record,
            other => panic!(
                "assert_accepted! failed:\n  line:    {:?}\n  outcome: {:?}",
                raw.text, other
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Feature rows
// ---------------------------------------------------------------------------

/// Assert every rate of a feature row lies in `[0, 1]`.
#[macro_export]
macro_rules! assert_rates_bounded {
    ($row:expr) => {{
        let row: &logfeat_core::FeatureRow = &$row;
        for (name, rate) in [
            ("error_rate", row.error_rate),
            ("http_4xx_rate", row.http_4xx_rate),
            ("http_5xx_rate", row.http_5xx_rate),
        ] {
            assert!(
                (0.0..=1.0).contains(&rate),
                "assert_rates_bounded! failed: {name} = {rate} for {} @ {}",
                row.service,
                row.bucket
            );
        }
    }};
}
