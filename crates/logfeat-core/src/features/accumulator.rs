//! Per-bucket running state.

use super::row::{mean, percentile, ratio, round6, FeatureRow};
use super::WeakLabelPolicy;
use crate::types::CanonicalLogRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;

pub const HTTP_RECEIVED: &str = "http.request.received";
pub const HTTP_COMPLETED: &str = "http.request.completed";

/// `(service, window_start)`; orders rows the way they are written out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub service: String,
    pub window_start: DateTime<Utc>,
}

/// Running counts for one [`BucketKey`].
///
/// Updates are commutative and [`merge`](Self::merge) is associative, so
/// partitions of a stream can be folded independently and combined in any
/// order. The weak label is not tracked here at all; it is derived from the
/// final counts in [`finalize`](Self::finalize).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureAccumulator {
    pub total_logs: u64,
    pub distinct_events: BTreeSet<String>,
    pub error_level_count: u64,
    pub http_received: u64,
    pub http_completed: u64,
    pub status_present: u64,
    pub duration_present: u64,
    pub http_4xx: u64,
    pub http_5xx: u64,
    /// 4xx/5xx seen on `http.request.completed` lines; the rate numerators.
    pub completed_4xx: u64,
    pub completed_5xx: u64,
    pub durations: Vec<f64>,
}

impl FeatureAccumulator {
    pub fn observe(&mut self, record: &CanonicalLogRecord) {
        self.total_logs += 1;

        let event = record.event.as_deref().filter(|e| !e.is_empty());
        if let Some(event) = event {
            self.distinct_events.insert(event.to_string());
        }
        let completed = event == Some(HTTP_COMPLETED);
        match event {
            Some(HTTP_RECEIVED) => self.http_received += 1,
            Some(HTTP_COMPLETED) => self.http_completed += 1,
            _ => {}
        }

        if record
            .level
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case("ERROR"))
        {
            self.error_level_count += 1;
        }

        if let Some(status) = record.status_code {
            self.status_present += 1;
            match status {
                400..=499 => {
                    self.http_4xx += 1;
                    self.completed_4xx += u64::from(completed);
                }
                500..=599 => {
                    self.http_5xx += 1;
                    self.completed_5xx += u64::from(completed);
                }
                _ => {}
            }
        }

        if let Some(duration) = record.duration_ms {
            self.duration_present += 1;
            self.durations.push(duration);
        }
    }

    /// Counts add, event sets union, duration lists concatenate.
    pub fn merge(&mut self, other: FeatureAccumulator) {
        self.total_logs += other.total_logs;
        self.distinct_events.extend(other.distinct_events);
        self.error_level_count += other.error_level_count;
        self.http_received += other.http_received;
        self.http_completed += other.http_completed;
        self.status_present += other.status_present;
        self.duration_present += other.duration_present;
        self.http_4xx += other.http_4xx;
        self.http_5xx += other.http_5xx;
        self.completed_4xx += other.completed_4xx;
        self.completed_5xx += other.completed_5xx;
        self.durations.extend(other.durations);
    }

    /// Weak anomaly label over the fully accumulated bucket: any 5xx, any
    /// ERROR-level line, or any request at or above the slow threshold.
    pub fn weak_label(&self, policy: &WeakLabelPolicy) -> bool {
        self.http_5xx > 0
            || self.error_level_count > 0
            || self.durations.iter().any(|d| *d >= policy.slow_request_ms)
    }

    /// Consume the accumulator into its feature row.
    ///
    /// Durations are sorted first, so every statistic, the mean included,
    /// is bit-for-bit independent of the order records arrived in.
    pub fn finalize(mut self, key: &BucketKey, policy: &WeakLabelPolicy) -> FeatureRow {
        let weak_label_anomaly = self.weak_label(policy);
        self.durations.sort_by(f64::total_cmp);
        let durations = &self.durations;

        FeatureRow {
            service: key.service.clone(),
            bucket: key
                .window_start
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            total_logs: self.total_logs,
            unique_events: self.distinct_events.len() as u64,
            error_level_count: self.error_level_count,
            http_received: self.http_received,
            http_completed: self.http_completed,
            status_present: self.status_present,
            duration_present: self.duration_present,
            http_4xx: self.http_4xx,
            http_5xx: self.http_5xx,
            duration_mean: round6(mean(durations)),
            duration_p95: round6(percentile(durations, 0.95)),
            duration_max: round6(durations.last().copied().unwrap_or(0.0)),
            error_rate: round6(ratio(self.error_level_count, self.total_logs.max(1))),
            http_4xx_rate: round6(ratio(self.completed_4xx, self.http_completed)),
            http_5xx_rate: round6(ratio(self.completed_5xx, self.http_completed)),
            weak_label_anomaly,
        }
    }
}
