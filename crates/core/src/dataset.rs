//! Benchmark result documents: the on-disk JSON shape and loading.
//!
//! A result document records one benchmark run of one system configuration:
//! per-query timing samples (best-of-N, individually nullable) plus zero or
//! more pricing tiers whose compute costs align 1:1 with the timings.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Samples for one query, typically three runs. `None` marks a run that
/// failed or was not recorded.
pub type QuerySamples = Vec<Option<f64>>;

/// One loaded benchmark result document.
///
/// Constructed once by [`BenchmarkDataset::load`] and immutable thereafter.
/// All metadata fields are optional in the wire format; missing values
/// default to `None` and render as `N/A`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkDataset {
  /// System display name (e.g. "ClickHouse Cloud")
  #[serde(default)]
  pub system: Option<String>,
  /// Machine or engine description
  #[serde(default)]
  pub machine: Option<String>,
  /// Number of nodes in the cluster
  #[serde(default)]
  pub cluster_size: Option<u32>,
  /// Dataset size in bytes
  #[serde(default)]
  pub data_size: Option<u64>,
  /// Per-query timing samples in seconds
  pub result: Vec<QuerySamples>,
  /// Per-sample configuration labels, parallel to `result`
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub query_labels: Option<Vec<Vec<Option<String>>>>,
  /// Cost tiers measured for this run
  #[serde(default)]
  pub costs: Vec<CostTier>,
}

/// A named pricing tier with per-query compute costs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostTier {
  /// Tier name (e.g. "Enterprise")
  pub tier: String,
  /// Per-query cost samples, aligned 1:1 with the dataset's timing samples
  #[serde(default)]
  pub compute_costs: Vec<QuerySamples>,
  /// Monthly storage cost for the whole dataset
  #[serde(default)]
  pub storage_cost: f64,
  /// Optional storage cost breakdown by term
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub storage_costs: Vec<StorageTerm>,
}

/// One term of a storage cost breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageTerm {
  /// Term name, "active" being the one that matters for totals
  #[serde(default)]
  pub term: Option<String>,
  /// Estimated monthly cost for this term
  #[serde(default)]
  pub estimated_cost: Option<f64>,
}

impl BenchmarkDataset {
  /// Load a result document from a JSON file.
  ///
  /// Malformed or unreadable input is a fatal error; there is no partial
  /// recovery.
  pub fn load(path: &Path) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    let dataset = serde_json::from_str(&json)?;
    Ok(dataset)
  }

  /// Display name for this dataset, falling back to `fallback` when the
  /// document carries no `system` field.
  pub fn display_name(&self, fallback: &str) -> String {
    self.system.clone().unwrap_or_else(|| fallback.to_string())
  }

  /// Number of queries in the result set.
  pub fn query_count(&self) -> usize {
    self.result.len()
  }
}

impl CostTier {
  /// Effective storage cost: the first breakdown term that is "active" or
  /// carries an estimate overrides the scalar.
  pub fn effective_storage_cost(&self) -> f64 {
    for term in &self.storage_costs {
      if term.term.as_deref() == Some("active") || term.estimated_cost.is_some() {
        return term.estimated_cost.unwrap_or(self.storage_cost);
      }
    }
    self.storage_cost
  }
}
