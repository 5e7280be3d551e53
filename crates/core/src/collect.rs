//! Directory scanning for the explorer report.
//!
//! Walks a tree shaped `<base>/<vendor>/results_<scale>/<config>.json`,
//! loads every result document, and flattens each into one [`DataPoint`]
//! suitable for embedding in the explorer HTML.

use crate::Result;
use crate::aggregate::{best_of, tier_total};
use crate::dataset::BenchmarkDataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// One aggregated result document, ready for charting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
  /// Vendor directory name (e.g. "snowflake")
  pub vendor: String,
  /// Configuration name, taken from the file stem
  pub config: String,
  /// Scale label, taken from the `results_<scale>` directory suffix
  pub scale: String,
  /// Sum of best-of-N timings over all queries, in seconds
  pub runtime: f64,
  /// Cost totals per tier
  pub tiers: Vec<TierCost>,
  /// System display name from the document, falling back to the config
  pub system: String,
  /// Machine or engine description
  #[serde(default)]
  pub machine: String,
  /// Cluster size
  #[serde(default = "default_cluster_size")]
  pub cluster_size: u32,
  /// Dataset size in bytes
  #[serde(default)]
  pub data_size: u64,
}

fn default_cluster_size() -> u32 {
  1
}

/// Aggregated costs for one tier of one data point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierCost {
  /// Tier name
  pub name: String,
  /// Total best-of-N compute cost across all queries
  pub compute_cost: f64,
  /// Effective monthly storage cost
  pub storage_cost: f64,
}

/// Scan `base_dir` for result documents and aggregate each into a
/// [`DataPoint`].
///
/// Files that fail to load or parse are logged and skipped; a bad file
/// never aborts the scan. Points come back ordered by vendor directory,
/// then by file path within each vendor.
pub fn collect_data_points(base_dir: &Path) -> Result<Vec<DataPoint>> {
  let mut vendors: Vec<_> = std::fs::read_dir(base_dir)?
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.path().is_dir())
    .map(|entry| entry.path())
    .collect();
  vendors.sort();

  let mut points = Vec::new();
  for vendor_dir in vendors {
    let Some(vendor) = dir_name(&vendor_dir) else {
      continue;
    };

    let pattern = vendor_dir.join("results_*").join("*.json");
    let mut paths: Vec<_> = glob::glob(&pattern.to_string_lossy())?.filter_map(|p| p.ok()).collect();
    paths.sort();

    for path in paths {
      match BenchmarkDataset::load(&path) {
        Ok(dataset) => {
          debug!("loaded {}", path.display());
          points.push(extract_data_point(&vendor, &path, &dataset));
        }
        Err(err) => {
          warn!("skipping {}: {}", path.display(), err);
        }
      }
    }
  }

  Ok(points)
}

fn extract_data_point(vendor: &str, path: &Path, dataset: &BenchmarkDataset) -> DataPoint {
  let config = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  let scale = path
    .parent()
    .and_then(dir_name)
    .and_then(|d| d.strip_prefix("results_").map(str::to_string))
    .unwrap_or_else(|| "unknown".to_string());

  // Failed queries contribute zero here; there is no cross-system
  // exclusion set in the explorer view.
  let runtime: f64 = dataset.result.iter().filter_map(|q| best_of(q)).sum();

  let no_exclusions = BTreeSet::new();
  let tiers = dataset
    .costs
    .iter()
    .map(|tier| TierCost {
      name: tier.tier.clone(),
      compute_cost: tier_total(tier, &no_exclusions),
      storage_cost: tier.effective_storage_cost(),
    })
    .collect();

  DataPoint {
    vendor: vendor.to_string(),
    system: dataset.display_name(&config),
    config,
    scale,
    runtime,
    tiers,
    machine: dataset.machine.clone().unwrap_or_default(),
    cluster_size: dataset.cluster_size.unwrap_or(1),
    data_size: dataset.data_size.unwrap_or(0),
  }
}

fn dir_name(path: &Path) -> Option<String> {
  path.file_name().map(|n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn write_result(dir: &Path, name: &str, json: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(name), json).unwrap();
  }

  #[test]
  fn test_collect_tree() {
    let temp = TempDir::new().unwrap();
    let base = temp.path();

    write_result(
      &base.join("firebolt").join("results_1B"),
      "L.json",
      r#"{
        "system": "Firebolt",
        "machine": "L",
        "cluster_size": 2,
        "data_size": 70000000000,
        "result": [[1.0, 0.9, 1.1], [null, null, null]],
        "costs": [{
          "tier": "Enterprise",
          "compute_costs": [[0.01, 0.02, 0.015], [null, null, null]],
          "storage_cost": 1.5
        }]
      }"#,
    );
    write_result(
      &base.join("snowflake").join("results_100M"),
      "XS.json",
      r#"{ "result": [[0.5, 0.4, 0.6]] }"#,
    );

    let points = collect_data_points(base).unwrap();

    assert_eq!(points.len(), 2);

    let fb = &points[0];
    assert_eq!(fb.vendor, "firebolt");
    assert_eq!(fb.config, "L");
    assert_eq!(fb.scale, "1B");
    assert_eq!(fb.system, "Firebolt");
    assert_eq!(fb.cluster_size, 2);
    assert!((fb.runtime - 0.9).abs() < 1e-9);
    assert_eq!(fb.tiers.len(), 1);
    assert!((fb.tiers[0].compute_cost - 0.01).abs() < 1e-9);
    assert!((fb.tiers[0].storage_cost - 1.5).abs() < 1e-9);

    let sf = &points[1];
    assert_eq!(sf.vendor, "snowflake");
    assert_eq!(sf.scale, "100M");
    // No system field: config stands in
    assert_eq!(sf.system, "XS");
    assert_eq!(sf.cluster_size, 1);
    assert!((sf.runtime - 0.4).abs() < 1e-9);
    assert!(sf.tiers.is_empty());
  }

  #[test]
  fn test_collect_skips_bad_files() {
    let temp = TempDir::new().unwrap();
    let base = temp.path();

    let dir = base.join("vendor").join("results_1B");
    write_result(&dir, "good.json", r#"{ "result": [[1.0]] }"#);
    write_result(&dir, "bad.json", "{ not json");

    let points = collect_data_points(base).unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].config, "good");
  }

  #[test]
  fn test_collect_ignores_non_result_dirs() {
    let temp = TempDir::new().unwrap();
    let base = temp.path();

    write_result(&base.join("vendor").join("scratch"), "x.json", r#"{ "result": [] }"#);
    std::fs::write(base.join("README.md"), "notes").unwrap();

    let points = collect_data_points(base).unwrap();
    assert!(points.is_empty());
  }

  #[test]
  fn test_collect_missing_base_dir() {
    let result = collect_data_points(Path::new("/nonexistent/results"));
    assert!(result.is_err());
  }
}
