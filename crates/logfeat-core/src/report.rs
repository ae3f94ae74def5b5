//! Counters emitted alongside the canonical store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a raw line did not reach the canonical store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No format matcher accepted the line.
    Unparseable,
    /// The canonical record failed the validity filter.
    Invalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCounts {
    pub written: u64,
    pub skipped: u64,
}

/// Conversion report for one batch of raw partitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Partition names in the order they were read.
    pub inputs: Vec<String>,
    pub total_lines: u64,
    pub written: u64,
    pub skipped_unparseable: u64,
    pub skipped_invalid: u64,
    pub malformed_payloads: u64,
    pub by_service: BTreeMap<String, ServiceCounts>,
}

impl ConversionReport {
    pub fn record_written(&mut self, service: &str) {
        self.written += 1;
        self.by_service.entry(service.to_string()).or_default().written += 1;
    }

    pub fn record_skipped(&mut self, service: &str, reason: SkipReason) {
        match reason {
            SkipReason::Unparseable => self.skipped_unparseable += 1,
            SkipReason::Invalid => self.skipped_invalid += 1,
        }
        self.by_service.entry(service.to_string()).or_default().skipped += 1;
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_unparseable + self.skipped_invalid
    }

    /// Fold another report (e.g. from a different partition) into this one.
    pub fn merge(&mut self, other: ConversionReport) {
        self.inputs.extend(other.inputs);
        self.total_lines += other.total_lines;
        self.written += other.written;
        self.skipped_unparseable += other.skipped_unparseable;
        self.skipped_invalid += other.skipped_invalid;
        self.malformed_payloads += other.malformed_payloads;
        for (service, counts) in other.by_service {
            let entry = self.by_service.entry(service).or_default();
            entry.written += counts.written;
            entry.skipped += counts.skipped;
        }
    }
}
