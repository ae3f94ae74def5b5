//! Feature-row export.

use logfeat_core::config::OutputFormat;
use logfeat_core::features::COLUMNS;
use logfeat_core::FeatureRow;
use std::io::{self, Write};

/// Write `rows` in `format`. CSV output always starts with the header row,
/// even when there are no rows.
pub fn write_rows<W: Write>(mut out: W, rows: &[FeatureRow], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record(COLUMNS)?;
            for row in rows {
                writer.write_record(row.cells())?;
            }
            writer.flush()?;
        }
        OutputFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut out, row)?;
                out.write_all(b"\n")?;
            }
        }
    }
    out.flush()
}
