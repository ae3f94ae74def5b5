//! logfeat-core — log normalization and windowed feature aggregation.
//!
//! # Architecture
//!
//! ```text
//! RawLine ──► normalizer::dispatch ──► schema::normalize ──► filter ──► store (JSONL)
//!                                                                        │
//!             FeatureRow ◄── Aggregator::finalize ◄── Aggregator::push ◄─┘
//! ```
//!
//! Conversion and aggregation are batch folds over finite input. Per-line
//! problems are counted, never raised; [`Error`] is reserved for failures
//! that stop a whole batch.

pub mod config;
pub mod convert;
pub mod error;
pub mod features;
pub mod filter;
pub mod normalizer;
pub mod report;
pub mod store;
pub mod types;

pub use convert::{convert_lines, Converter};
pub use error::{Error, Result};
pub use features::{Aggregator, FeatureRow, FeatureSet, WeakLabelPolicy, WindowSize};
pub use report::ConversionReport;
pub use types::{CanonicalLogRecord, FieldBag, LogFormat, RawLine, SCHEMA_KEYS};
