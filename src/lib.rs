//! logfeat — normalize heterogeneous service logs and aggregate them into
//! windowed feature rows.
//!
//! The heavy lifting lives in `logfeat-core`; this crate wires feeds, the
//! conversion loop, and the aggregation passes into batch jobs that the
//! `logfeat` binary (and the integration harnesses) drive.
//!
//! # Architecture
//!
//! ```text
//! FeedSource ──► convert (per partition) ──► canonical store + report
//!                                                  │
//!            feature files ◄── window passes ◄─────┘
//!                              (JoinSet, one per window;
//!                               spawn_blocking, one per shard)
//! ```

pub mod output;
pub mod pipeline;

pub use pipeline::{
    run_convert, run_features, ConvertPlan, FeaturesOutcome, FeaturesPlan, WindowOutput,
};
