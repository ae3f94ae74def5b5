//! Batch jobs: raw partitions → canonical store, canonical store → feature files.
//!
//! Both jobs read all of their input before creating any output, so a missing
//! input aborts with nothing written.

use anyhow::Context;
use logfeat_core::config::{Config, ConvertConfig, OutputFormat};
use logfeat_core::features::AggregationStats;
use logfeat_core::store::{self, StoreBatch};
use logfeat_core::{
    Aggregator, CanonicalLogRecord, ConversionReport, Converter, Error, WeakLabelPolicy,
    WindowSize,
};
use logfeat_feeds::{FeedSource, Partition};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// Inputs and outputs of one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertPlan {
    pub source: FeedSource,
    pub canonical_out: PathBuf,
    /// One `<service>.jsonl` per partition is written here when set.
    pub per_source_dir: Option<PathBuf>,
    pub report_out: PathBuf,
}

impl ConvertPlan {
    pub fn from_config(cfg: &ConvertConfig) -> Self {
        Self {
            source: FeedSource::Path {
                path: cfg.input_dir.clone(),
                extension: cfg.extension.clone(),
            },
            canonical_out: cfg.canonical_out.clone(),
            per_source_dir: cfg.per_source_dir().map(Path::to_path_buf),
            report_out: cfg.report_out.clone(),
        }
    }
}

struct ConvertedPartition {
    index: usize,
    service: String,
    records: Vec<CanonicalLogRecord>,
    report: ConversionReport,
}

/// Convert every partition of `plan.source` and write the canonical store,
/// the optional per-source files, and the conversion report.
pub async fn run_convert(plan: &ConvertPlan) -> anyhow::Result<ConversionReport> {
    let partitions = plan.source.read().await?;
    let converted = convert_partitions(partitions).await?;

    let mut report = ConversionReport::default();
    let mut merged = Vec::new();
    let mut per_source: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for part in converted {
        let encoded = encode(&part.records)?;
        merged.extend_from_slice(&encoded);
        if plan.per_source_dir.is_some() {
            per_source.entry(part.service).or_default().extend(encoded);
        }
        report.merge(part.report);
    }

    write_file(&plan.canonical_out, &merged).await?;
    if let Some(dir) = &plan.per_source_dir {
        for (service, bytes) in &per_source {
            write_file(&dir.join(format!("{service}.jsonl")), bytes).await?;
        }
    }
    write_file(&plan.report_out, &serde_json::to_vec_pretty(&report)?).await?;

    tracing::info!(
        inputs = report.inputs.len(),
        total_lines = report.total_lines,
        written = report.written,
        skipped_unparseable = report.skipped_unparseable,
        skipped_invalid = report.skipped_invalid,
        malformed_payloads = report.malformed_payloads,
        out = %plan.canonical_out.display(),
        "conversion complete"
    );
    Ok(report)
}

/// Convert partitions in parallel, returning them in input order.
async fn convert_partitions(partitions: Vec<Partition>) -> anyhow::Result<Vec<ConvertedPartition>> {
    let mut set = JoinSet::new();
    for (index, partition) in partitions.into_iter().enumerate() {
        set.spawn_blocking(move || {
            let mut converter = Converter::new();
            converter.begin_input(partition.name.as_str());
            let records = partition
                .lines
                .iter()
                .filter_map(|line| converter.push(line))
                .collect();
            let report = converter.finish();
            tracing::debug!(
                partition = %partition.name,
                written = report.written,
                skipped = report.skipped(),
                "partition converted"
            );
            ConvertedPartition {
                index,
                service: partition.service,
                records,
                report,
            }
        });
    }

    let mut done = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        done.push(joined.context("conversion task failed")?);
    }
    done.sort_by_key(|p| p.index);
    Ok(done)
}

fn encode(records: &[CanonicalLogRecord]) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    for record in records {
        store::write_record(&mut buf, record)?;
    }
    Ok(buf)
}

async fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| Error::io(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Feature extraction
// ---------------------------------------------------------------------------

/// Inputs and outputs of one feature run.
#[derive(Debug, Clone)]
pub struct FeaturesPlan {
    pub canonical_in: PathBuf,
    pub out_dir: PathBuf,
    pub windows: Vec<WindowSize>,
    pub shards: usize,
    pub format: OutputFormat,
    pub policy: WeakLabelPolicy,
}

impl FeaturesPlan {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            canonical_in: cfg.features.canonical_in.clone(),
            out_dir: cfg.features.out_dir.clone(),
            windows: cfg.features.windows()?,
            shards: cfg.features.shards,
            format: cfg.features.format,
            policy: cfg.weak_label.clone(),
        })
    }
}

/// One written feature file.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOutput {
    pub window: WindowSize,
    pub path: PathBuf,
    pub rows: usize,
    pub anomalous: usize,
    pub stats: AggregationStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturesOutcome {
    /// Store lines that were not JSON objects.
    pub malformed_rows: u64,
    /// One entry per window, in the order the windows were given.
    pub outputs: Vec<WindowOutput>,
}

/// Read a canonical store in full.
pub async fn load_store(path: &Path) -> anyhow::Result<StoreBatch> {
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::MissingInput(path.to_path_buf()),
        _ => Error::io(path, e),
    })?;
    let batch = store::read_records(bytes.as_slice()).map_err(|e| Error::io(path, e))?;
    if batch.malformed_rows > 0 {
        tracing::warn!(
            path = %path.display(),
            malformed_rows = batch.malformed_rows,
            "skipped canonical rows that are not JSON objects"
        );
    }
    Ok(batch)
}

/// Fold `records` for one window: split into `shards` contiguous partitions,
/// fold each on the blocking pool, then merge into a single owner.
pub async fn aggregate(
    records: Arc<[CanonicalLogRecord]>,
    window: WindowSize,
    shards: usize,
) -> anyhow::Result<Aggregator> {
    let chunk = records.len().div_ceil(shards.max(1)).max(1);
    let mut set = JoinSet::new();
    for start in (0..records.len()).step_by(chunk) {
        let records = Arc::clone(&records);
        let end = (start + chunk).min(records.len());
        set.spawn_blocking(move || Aggregator::fold(window, &records[start..end]));
    }

    let mut merged = Aggregator::new(window);
    while let Some(joined) = set.join_next().await {
        merged.merge(joined.context("aggregation shard failed")?)?;
    }
    Ok(merged)
}

/// Aggregate the canonical store once per window size and write one feature
/// file per window (`features_<label>.<ext>`).
pub async fn run_features(plan: &FeaturesPlan) -> anyhow::Result<FeaturesOutcome> {
    let batch = load_store(&plan.canonical_in).await?;
    let records: Arc<[CanonicalLogRecord]> = batch.records.into();
    tracing::info!(
        path = %plan.canonical_in.display(),
        records = records.len(),
        windows = plan.windows.len(),
        "aggregating canonical store"
    );

    let mut set = JoinSet::new();
    for (index, window) in plan.windows.iter().copied().enumerate() {
        let records = Arc::clone(&records);
        let plan = plan.clone();
        set.spawn(async move {
            let features = aggregate(records, window, plan.shards)
                .await?
                .finalize(&plan.policy);
            let path = plan
                .out_dir
                .join(format!("features_{}.{}", window.label(), plan.format.extension()));

            let mut buf = Vec::new();
            crate::output::write_rows(&mut buf, &features.rows, plan.format)?;
            write_file(&path, &buf).await?;

            let anomalous = features.rows.iter().filter(|r| r.weak_label_anomaly).count();
            tracing::info!(
                %window,
                rows = features.rows.len(),
                anomalous,
                unparseable_timestamps = features.stats.unparseable_timestamps,
                out = %path.display(),
                "feature pass complete"
            );
            anyhow::Ok((
                index,
                WindowOutput {
                    window,
                    path,
                    rows: features.rows.len(),
                    anomalous,
                    stats: features.stats,
                },
            ))
        });
    }

    let mut outputs = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        outputs.push(joined.context("feature pass failed")??);
    }
    outputs.sort_by_key(|(index, _)| *index);

    Ok(FeaturesOutcome {
        malformed_rows: batch.malformed_rows,
        outputs: outputs.into_iter().map(|(_, out)| out).collect(),
    })
}
