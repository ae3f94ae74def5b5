//! Windowed feature aggregation.
//!
//! ```text
//! canonical records ──► Aggregator (one per window size) ──► FeatureSet
//!                         │  BucketKey → FeatureAccumulator
//!                         └─ merge() across partitions, finalize() once
//! ```

mod accumulator;
mod aggregator;
mod row;
mod window;

pub use accumulator::{BucketKey, FeatureAccumulator, HTTP_COMPLETED, HTTP_RECEIVED};
pub use aggregator::{AggregationStats, Aggregator, FeatureSet};
pub use row::{mean, percentile, ratio, round6, FeatureRow, COLUMNS};
pub use window::WindowSize;

use serde::Deserialize;

/// Thresholds behind the weak (heuristic, not ground-truth) anomaly label.
#[derive(Debug, Clone, Deserialize)]
pub struct WeakLabelPolicy {
    /// A request at or above this duration marks its bucket anomalous.
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: f64,
}

fn default_slow_request_ms() -> f64 { 10_000.0 }

impl Default for WeakLabelPolicy {
    fn default() -> Self {
        Self {
            slow_request_ms: default_slow_request_ms(),
        }
    }
}
