//! Finalized feature rows and the statistics that produce them.

use serde::{Deserialize, Serialize};

/// Column order of the tabular feature output.
pub const COLUMNS: [&str; 18] = [
    "service",
    "bucket",
    "total_logs",
    "unique_events",
    "error_level_count",
    "http_received",
    "http_completed",
    "status_present",
    "duration_present",
    "http_4xx",
    "http_5xx",
    "duration_mean",
    "duration_p95",
    "duration_max",
    "error_rate",
    "http_4xx_rate",
    "http_5xx_rate",
    "weak_label_anomaly",
];

/// One finalized `(service, window)` bucket. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub service: String,
    /// Window start as an ISO-8601 UTC instant.
    pub bucket: String,
    pub total_logs: u64,
    pub unique_events: u64,
    pub error_level_count: u64,
    pub http_received: u64,
    pub http_completed: u64,
    pub status_present: u64,
    pub duration_present: u64,
    pub http_4xx: u64,
    pub http_5xx: u64,
    pub duration_mean: f64,
    pub duration_p95: f64,
    pub duration_max: f64,
    pub error_rate: f64,
    pub http_4xx_rate: f64,
    pub http_5xx_rate: f64,
    pub weak_label_anomaly: bool,
}

impl FeatureRow {
    /// Cells in [`COLUMNS`] order. The label is written as `0`/`1`.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.service.clone(),
            self.bucket.clone(),
            self.total_logs.to_string(),
            self.unique_events.to_string(),
            self.error_level_count.to_string(),
            self.http_received.to_string(),
            self.http_completed.to_string(),
            self.status_present.to_string(),
            self.duration_present.to_string(),
            self.http_4xx.to_string(),
            self.http_5xx.to_string(),
            self.duration_mean.to_string(),
            self.duration_p95.to_string(),
            self.duration_max.to_string(),
            self.error_rate.to_string(),
            self.http_4xx_rate.to_string(),
            self.http_5xx_rate.to_string(),
            u8::from(self.weak_label_anomaly).to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Percentile by linear interpolation between order statistics.
///
/// `sorted` must be ascending. `p` is a fraction in `[0, 1]`. Returns `0.0`
/// for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (sorted.len() - 1) as f64 * p;
    let lo = rank.floor();
    let hi = rank.ceil();
    if lo == hi {
        return sorted[rank as usize];
    }
    sorted[lo as usize] * (hi - rank) + sorted[hi as usize] * (rank - lo)
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Round to six decimal places, the precision feature files carry.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::single(&[42.0], 42.0)]
    #[case::five(&[10.0, 20.0, 30.0, 40.0, 50.0], 48.0)]
    #[case::two(&[0.0, 100.0], 95.0)]
    #[case::twenty_one(&(0..=20).map(f64::from).collect::<Vec<_>>(), 19.0)]
    fn p95(#[case] sorted: &[f64], #[case] expected: f64) {
        assert!((percentile(sorted, 0.95) - expected).abs() < 1e-9);
    }

    #[test]
    fn percentile_of_nothing_is_zero() {
        assert_eq!(percentile(&[], 0.95), 0.0);
    }

    #[test]
    fn percentile_endpoints() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 1.0), 3.0);
    }

    #[test]
    fn ratio_guards_zero() {
        assert_eq!(ratio(3, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn rounding_cleans_interpolation_noise() {
        assert_eq!(round6(percentile(&[10.0, 20.0, 30.0, 40.0, 50.0], 0.95)), 48.0);
    }

    #[test]
    fn cells_follow_column_order() {
        let row = FeatureRow {
            service: "a".into(),
            bucket: "2025-01-01T00:00:00Z".into(),
            total_logs: 1,
            unique_events: 1,
            error_level_count: 0,
            http_received: 0,
            http_completed: 0,
            status_present: 0,
            duration_present: 0,
            http_4xx: 0,
            http_5xx: 0,
            duration_mean: 0.0,
            duration_p95: 0.0,
            duration_max: 0.0,
            error_rate: 0.0,
            http_4xx_rate: 0.0,
            http_5xx_rate: 0.0,
            weak_label_anomaly: true,
        };
        let cells = row.cells();
        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], "a");
        assert_eq!(cells[17], "1");

        let value = serde_json::to_value(&row).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), COLUMNS.len());
    }
}
