//! Folds canonical records into per-bucket accumulators.

use super::accumulator::{BucketKey, FeatureAccumulator};
use super::row::FeatureRow;
use super::window::WindowSize;
use super::WeakLabelPolicy;
use crate::error::{Error, Result};
use crate::normalizer::timestamp::parse_instant;
use crate::types::CanonicalLogRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw totals seen by one aggregation pass, including records that never
/// reached a bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationStats {
    pub rows_read: u64,
    pub unparseable_timestamps: u64,
    pub by_service: BTreeMap<String, u64>,
}

impl AggregationStats {
    fn merge(&mut self, other: AggregationStats) {
        self.rows_read += other.rows_read;
        self.unparseable_timestamps += other.unparseable_timestamps;
        for (service, n) in other.by_service {
            *self.by_service.entry(service).or_default() += n;
        }
    }
}

/// Accumulator map for one window size.
///
/// Owned by a single fold; partitions are combined with [`merge`](Self::merge)
/// and the result is consumed once by [`finalize`](Self::finalize).
#[derive(Debug, Clone)]
pub struct Aggregator {
    window: WindowSize,
    buckets: BTreeMap<BucketKey, FeatureAccumulator>,
    stats: AggregationStats,
}

impl Aggregator {
    pub fn new(window: WindowSize) -> Self {
        Self {
            window,
            buckets: BTreeMap::new(),
            stats: AggregationStats::default(),
        }
    }

    /// Fold a whole slice in one go.
    pub fn fold<'a, I>(window: WindowSize, records: I) -> Self
    where
        I: IntoIterator<Item = &'a CanonicalLogRecord>,
    {
        let mut agg = Self::new(window);
        records.into_iter().for_each(|r| agg.push(r));
        agg
    }

    pub fn window(&self) -> WindowSize {
        self.window
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Fold one record. Records whose timestamp is not a parseable instant
    /// are counted but otherwise ignored.
    pub fn push(&mut self, record: &CanonicalLogRecord) {
        let service = record.service_or_unknown();
        self.stats.rows_read += 1;
        *self.stats.by_service.entry(service.to_string()).or_default() += 1;

        let Some(ts) = record.timestamp.as_deref().and_then(parse_instant) else {
            self.stats.unparseable_timestamps += 1;
            tracing::trace!(%service, timestamp = ?record.timestamp, "excluded from windowing");
            return;
        };

        let key = BucketKey {
            service: service.to_string(),
            window_start: self.window.floor(ts),
        };
        self.buckets.entry(key).or_default().observe(record);
    }

    /// Combine another partition's state into this one.
    pub fn merge(&mut self, other: Aggregator) -> Result<()> {
        if other.window != self.window {
            return Err(Error::WindowMismatch {
                this: self.window.secs(),
                other: other.window.secs(),
            });
        }
        for (key, acc) in other.buckets {
            self.buckets.entry(key).or_default().merge(acc);
        }
        self.stats.merge(other.stats);
        Ok(())
    }

    /// Turn every accumulator into a row, sorted by `(service, window_start)`.
    pub fn finalize(self, policy: &WeakLabelPolicy) -> FeatureSet {
        let rows = self
            .buckets
            .into_iter()
            .map(|(key, acc)| acc.finalize(&key, policy))
            .collect();
        FeatureSet {
            window: self.window,
            rows,
            stats: self.stats,
        }
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSet {
    pub window: WindowSize,
    pub rows: Vec<FeatureRow>,
    pub stats: AggregationStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rec(ts: &str, service: Option<&str>, event: &str) -> CanonicalLogRecord {
        CanonicalLogRecord {
            timestamp: Some(ts.into()),
            service: service.map(Into::into),
            event: Some(event.into()),
            level: Some("INFO".into()),
            ..Default::default()
        }
    }

    fn one_minute() -> WindowSize {
        WindowSize::from_minutes(1).unwrap()
    }

    #[test]
    fn records_split_by_service_and_window() {
        let records = vec![
            rec("2025-01-01T00:00:05Z", Some("a"), "x"),
            rec("2025-01-01T00:00:55Z", Some("a"), "y"),
            rec("2025-01-01T00:01:00Z", Some("a"), "x"),
            rec("2025-01-01T00:00:10Z", Some("b"), "x"),
        ];
        let set = Aggregator::fold(one_minute(), &records).finalize(&WeakLabelPolicy::default());
        let keys: Vec<(&str, &str, u64)> = set
            .rows
            .iter()
            .map(|r| (r.service.as_str(), r.bucket.as_str(), r.total_logs))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a", "2025-01-01T00:00:00Z", 2),
                ("a", "2025-01-01T00:01:00Z", 1),
                ("b", "2025-01-01T00:00:00Z", 1),
            ]
        );
        assert_eq!(set.rows[0].unique_events, 2);
    }

    #[test]
    fn wider_window_is_an_independent_pass() {
        let records = vec![
            rec("2025-01-01T00:00:05Z", Some("a"), "x"),
            rec("2025-01-01T00:04:05Z", Some("a"), "x"),
        ];
        let one = Aggregator::fold(one_minute(), &records);
        let five = Aggregator::fold(WindowSize::from_minutes(5).unwrap(), &records);
        assert_eq!(one.bucket_count(), 2);
        assert_eq!(five.bucket_count(), 1);
    }

    #[test]
    fn unparseable_timestamps_are_counted_not_bucketed() {
        let records = vec![
            rec("2025-01-01T00:00:05Z", Some("a"), "x"),
            rec("yesterday", Some("a"), "x"),
            rec("2025-01-01T00:00:05Z", None, "x"),
        ];
        let agg = Aggregator::fold(one_minute(), &records);
        assert_eq!(agg.stats().rows_read, 3);
        assert_eq!(agg.stats().unparseable_timestamps, 1);
        assert_eq!(agg.stats().by_service["a"], 2);
        assert_eq!(agg.stats().by_service["unknown"], 1);
        assert_eq!(agg.bucket_count(), 2);
    }

    #[test]
    fn offsets_are_bucketed_in_utc() {
        let records = vec![rec("2025-01-01T05:30:20+05:30", Some("a"), "x")];
        let set = Aggregator::fold(one_minute(), &records).finalize(&WeakLabelPolicy::default());
        assert_eq!(set.rows[0].bucket, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn partitioned_fold_matches_single_fold() {
        let records: Vec<CanonicalLogRecord> = (0..30)
            .map(|i| {
                let mut r = rec(&format!("2025-01-01T00:{:02}:{:02}Z", i / 10, (i * 7) % 60), Some(["a", "b"][i % 2]), "e");
                r.duration_ms = Some(i as f64 * 1.5);
                r.status_code = Some([200, 404, 503][i % 3]);
                r
            })
            .collect();
        let policy = WeakLabelPolicy::default();
        let whole = Aggregator::fold(one_minute(), &records).finalize(&policy);

        let mut merged = Aggregator::new(one_minute());
        for chunk in records.chunks(7).rev() {
            merged.merge(Aggregator::fold(one_minute(), chunk)).unwrap();
        }
        assert_eq!(merged.finalize(&policy), whole);
    }

    #[test]
    fn merge_rejects_mismatched_windows() {
        let mut one = Aggregator::new(one_minute());
        let five = Aggregator::new(WindowSize::from_minutes(5).unwrap());
        assert!(matches!(one.merge(five), Err(Error::WindowMismatch { .. })));
    }
}
