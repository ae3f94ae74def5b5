//! Configuration types for logfeat.
//!
//! [`Config::load`] layers, lowest priority first: the embedded defaults, an
//! optional TOML file (`--config`, else `~/.config/logfeat/config.toml`), and
//! `LOGFEAT__SECTION__KEY` environment variables. [`Config::defaults`] returns
//! the embedded defaults without touching the filesystem (useful in tests).

use crate::features::{WeakLabelPolicy, WindowSize};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[convert]
input_dir      = "data/raw"
extension      = "log"
canonical_out  = "data/processed/logs.jsonl"
per_source_dir = "data/processed/logs"
report_out     = "outputs/convert_report.json"

[features]
canonical_in    = "data/processed/logs.jsonl"
out_dir         = "data/features"
windows_minutes = [1, 5]
shards          = 4
format          = "csv"

[weak_label]
slow_request_ms = 10000.0
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub weak_label: WeakLabelPolicy,
}

/// `[convert]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Extension (without the dot) of raw partition files.
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_canonical_path")]
    pub canonical_out: PathBuf,
    /// Directory for one canonical file per partition; empty disables.
    #[serde(default = "default_per_source_dir")]
    pub per_source_dir: PathBuf,
    #[serde(default = "default_report_out")]
    pub report_out: PathBuf,
}

fn default_input_dir() -> PathBuf { PathBuf::from("data/raw") }
fn default_extension() -> String { "log".to_string() }
fn default_canonical_path() -> PathBuf { PathBuf::from("data/processed/logs.jsonl") }
fn default_per_source_dir() -> PathBuf { PathBuf::from("data/processed/logs") }
fn default_report_out() -> PathBuf { PathBuf::from("outputs/convert_report.json") }

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            extension: default_extension(),
            canonical_out: default_canonical_path(),
            per_source_dir: default_per_source_dir(),
            report_out: default_report_out(),
        }
    }
}

impl ConvertConfig {
    pub fn per_source_dir(&self) -> Option<&Path> {
        Some(self.per_source_dir.as_path()).filter(|p| !p.as_os_str().is_empty())
    }
}

/// Tabular encodings for feature rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// `[features]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_canonical_path")]
    pub canonical_in: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_windows_minutes")]
    pub windows_minutes: Vec<u32>,
    /// Partitions folded in parallel per window pass.
    #[serde(default = "default_shards")]
    pub shards: usize,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

fn default_out_dir() -> PathBuf { PathBuf::from("data/features") }
fn default_windows_minutes() -> Vec<u32> { vec![1, 5] }
fn default_shards() -> usize { 4 }
fn default_format() -> OutputFormat { OutputFormat::Csv }

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            canonical_in: default_canonical_path(),
            out_dir: default_out_dir(),
            windows_minutes: default_windows_minutes(),
            shards: default_shards(),
            format: default_format(),
        }
    }
}

impl FeaturesConfig {
    /// Configured windows, validated.
    pub fn windows(&self) -> crate::Result<Vec<WindowSize>> {
        self.windows_minutes
            .iter()
            .map(|m| WindowSize::from_minutes(*m))
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the layered configuration. An explicit `path` must exist; the
    /// per-user file is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(config_path().as_path()).required(false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("LOGFEAT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logfeat")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
