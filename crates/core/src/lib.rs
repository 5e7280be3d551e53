//! Cost/performance reporting for data-warehouse benchmark results.
//!
//! Transforms benchmark JSON result files (per-query timing samples and
//! per-tier compute/storage costs) into human-readable outputs:
//!
//! - **Comparison**: markdown report pitting two systems against each other
//! - **Explorer**: self-contained HTML document embedding many aggregated
//!   results for interactive charting
//!
//! ## Key Concepts
//!
//! - **Best-of-N**: the minimum among N repeated samples, ignoring absent ones
//! - **Failed query**: a query whose every sample is absent
//! - **Exclusion set**: queries failed in either compared dataset, omitted
//!   from all head-to-head totals and win counts
//!
//! The pipeline is strictly linear: load ([`dataset`]) → aggregate
//! ([`aggregate`]) → render ([`reports`]). Everything is synchronous and
//! operates on immutable loaded data.

pub mod aggregate;
pub mod collect;
pub mod dataset;
pub mod reports;

pub use aggregate::{Comparison, QueryRow, Savings, SystemSummary, TierComparison, compare};
pub use collect::{DataPoint, TierCost, collect_data_points};
pub use dataset::{BenchmarkDataset, CostTier, StorageTerm};
pub use reports::{ExplorerReport, MarkdownReport};

use thiserror::Error;

/// Errors from loading or collecting benchmark results.
#[derive(Debug, Error)]
pub enum CostbenchError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Glob error: {0}")]
  Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, CostbenchError>;
