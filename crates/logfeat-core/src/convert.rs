//! Conversion loop: raw lines in, canonical records and a report out.
//!
//! Every per-line failure degrades to a counted skip, so one bad line never
//! aborts a batch.

use crate::normalizer::{convert_line, LineOutcome};
use crate::report::{ConversionReport, SkipReason};
use crate::types::{CanonicalLogRecord, RawLine};

/// Stateful converter that tallies a [`ConversionReport`] as lines go by.
#[derive(Debug, Default)]
pub struct Converter {
    report: ConversionReport,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note the start of a new input partition in the report.
    pub fn begin_input(&mut self, name: impl Into<String>) {
        self.report.inputs.push(name.into());
    }

    /// Convert one line. Returns the record when it should be written.
    pub fn push(&mut self, raw: &RawLine) -> Option<CanonicalLogRecord> {
        self.report.total_lines += 1;

        match convert_line(raw) {
            LineOutcome::Accepted(converted) => {
                if converted.payload_malformed {
                    self.report.malformed_payloads += 1;
                    tracing::debug!(format = %converted.format, "embedded payload failed to decode");
                }
                self.report
                    .record_written(converted.record.service_or_unknown());
                Some(converted.record)
            }
            LineOutcome::Unparseable => {
                tracing::trace!(service = %raw.default_service, line = %raw.text, "no format matched");
                self.report
                    .record_skipped(&raw.default_service, SkipReason::Unparseable);
                None
            }
            LineOutcome::Invalid(converted) => {
                if converted.payload_malformed {
                    self.report.malformed_payloads += 1;
                }
                let service = converted
                    .record
                    .service
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(&raw.default_service);
                tracing::trace!(%service, format = %converted.format, "record failed validity filter");
                self.report.record_skipped(service, SkipReason::Invalid);
                None
            }
        }
    }

    pub fn report(&self) -> &ConversionReport {
        &self.report
    }

    pub fn finish(self) -> ConversionReport {
        self.report
    }
}

/// Convert a finite batch of lines in one go.
pub fn convert_lines<'a, I>(lines: I) -> (Vec<CanonicalLogRecord>, ConversionReport)
where
    I: IntoIterator<Item = &'a RawLine>,
{
    let mut converter = Converter::new();
    let records = lines
        .into_iter()
        .filter_map(|raw| converter.push(raw))
        .collect();
    (records, converter.finish())
}
