//! Aggregation and head-to-head comparison of benchmark datasets.
//!
//! Two categories of computation:
//! - Per-query reductions: best-of-N timing, winning sample attribution,
//!   failure detection
//! - Dataset-level comparison: runtime totals, win tallies, tier cost
//!   pairing and savings
//!
//! Query indices are 0-based everywhere in this module; display strings
//! (`Q1`..`Qn`) are 1-based and produced only by the renderers.

use crate::dataset::{BenchmarkDataset, CostTier, QuerySamples};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum of the non-absent samples, or `None` when all are absent.
pub fn best_of(samples: &[Option<f64>]) -> Option<f64> {
  samples.iter().flatten().copied().reduce(f64::min)
}

/// Index of the minimum non-absent sample, for attributing which
/// configuration variant produced the winning run. `None` when all absent.
pub fn winning_sample_index(samples: &[Option<f64>]) -> Option<usize> {
  samples
    .iter()
    .enumerate()
    .filter_map(|(i, t)| t.map(|t| (i, t)))
    .min_by(|a, b| a.1.total_cmp(&b.1))
    .map(|(i, _)| i)
}

/// Per-query label of the winning run.
///
/// `None` wherever labels are missing, too short, or the query failed.
/// Literal `"null"` strings are treated as absent (they appear in older
/// result files where labels were stringified).
pub fn winning_labels(results: &[QuerySamples], labels: Option<&[Vec<Option<String>>]>) -> Vec<Option<String>> {
  let Some(labels) = labels else {
    return vec![None; results.len()];
  };

  results
    .iter()
    .enumerate()
    .map(|(i, samples)| {
      let q_labels = labels.get(i)?;
      let idx = winning_sample_index(samples)?;
      q_labels.get(idx).cloned().flatten().filter(|l| l != "null")
    })
    .collect()
}

/// Ordered 0-based indices of failed queries: those whose every sample is
/// absent.
pub fn detect_failures(results: &[QuerySamples]) -> Vec<usize> {
  results
    .iter()
    .enumerate()
    .filter(|(_, samples)| samples.iter().all(Option::is_none))
    .map(|(i, _)| i)
    .collect()
}

/// Find a tier by name: exact match wins, otherwise the first
/// case-insensitive substring match in either direction.
///
/// Exact-first precedence keeps a "Standard" lookup from silently pairing
/// with "Standard Plus" when a same-named tier exists.
pub fn match_tier<'a>(tiers: &'a [CostTier], name: &str) -> Option<&'a CostTier> {
  if let Some(tier) = tiers.iter().find(|t| t.tier == name) {
    return Some(tier);
  }

  let needle = name.to_lowercase();
  tiers.iter().find(|t| {
    let hay = t.tier.to_lowercase();
    hay.contains(&needle) || needle.contains(&hay)
  })
}

/// Total compute cost for a tier: sum over queries not in `exclude` of the
/// best (minimum) cost sample. All-absent queries contribute zero.
pub fn tier_total(tier: &CostTier, exclude: &BTreeSet<usize>) -> f64 {
  tier
    .compute_costs
    .iter()
    .enumerate()
    .filter(|(i, _)| !exclude.contains(i))
    .filter_map(|(_, costs)| best_of(costs))
    .sum()
}

/// Directional savings between two positive figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Savings {
  /// Display name of the cheaper (or faster) side
  pub winner: String,
  /// Percentage saved: (larger - smaller) / larger * 100
  pub percent: f64,
}

/// Savings between two figures, attributed to the smaller side.
///
/// Not scored when either operand is non-positive (avoids divide-by-zero
/// and meaningless negative-cost deltas) or when the figures tie.
pub fn savings(name_a: &str, a: f64, name_b: &str, b: f64) -> Option<Savings> {
  if a <= 0.0 || b <= 0.0 || a == b {
    return None;
  }

  let (winner, smaller, larger) = if b < a { (name_b, b, a) } else { (name_a, a, b) };
  Some(Savings {
    winner: winner.to_string(),
    percent: (larger - smaller) / larger * 100.0,
  })
}

/// Aggregated view of one side of a comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSummary {
  /// Display name
  pub name: String,
  /// Machine or engine description
  pub machine: Option<String>,
  /// Cluster size
  pub cluster_size: Option<u32>,
  /// Dataset size in bytes
  pub data_size: Option<u64>,
  /// Sum of best-of-N timings over non-excluded queries, in seconds
  pub total_runtime: f64,
  /// Queries won by strict comparison of best times
  pub wins: usize,
  /// 0-based indices of failed queries
  pub failed: Vec<usize>,
  /// Monthly storage cost (first tier's effective figure)
  pub storage_cost: f64,
}

/// One matched tier pairing with totals over the shared exclusion set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierComparison {
  /// Tier name on the first system
  pub tier_a: String,
  /// Matched tier name on the second system
  pub tier_b: String,
  /// Total compute cost for the first system
  pub total_a: f64,
  /// Total compute cost for the second system
  pub total_b: f64,
  /// Which side is cheaper, when scorable
  #[serde(skip_serializing_if = "Option::is_none")]
  pub savings: Option<Savings>,
}

impl TierComparison {
  /// Display label: the shared name, or "A/B" when the pairing was fuzzy.
  pub fn label(&self) -> String {
    if self.tier_a == self.tier_b {
      self.tier_a.clone()
    } else {
      format!("{}/{}", self.tier_a, self.tier_b)
    }
  }
}

/// Per-query detail row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRow {
  /// 0-based query index
  pub index: usize,
  /// Best time for the first system, `None` on failure
  pub best_a: Option<f64>,
  /// Best time for the second system, `None` on failure
  pub best_b: Option<f64>,
  /// Winning configuration label for the first system
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label_a: Option<String>,
  /// Winning configuration label for the second system
  #[serde(skip_serializing_if = "Option::is_none")]
  pub label_b: Option<String>,
}

/// Head-to-head comparison of two benchmark datasets.
///
/// Derived, never persisted: computed fresh per report generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
  /// First system
  pub a: SystemSummary,
  /// Second system
  pub b: SystemSummary,
  /// Queries failed in either dataset, excluded from all head-to-head
  /// totals and win counts (0-based, ordered)
  pub excluded: Vec<usize>,
  /// Total queries in the larger result set
  pub total_queries: usize,
  /// Queries that succeeded in both systems
  pub successful_queries: usize,
  /// Storage cost savings, when scorable
  #[serde(skip_serializing_if = "Option::is_none")]
  pub storage_savings: Option<Savings>,
  /// Matched tier cost comparisons
  pub tiers: Vec<TierComparison>,
  /// Runtime savings, when scorable
  #[serde(skip_serializing_if = "Option::is_none")]
  pub runtime_savings: Option<Savings>,
  /// Per-query detail rows
  pub queries: Vec<QueryRow>,
}

/// Compare two datasets head to head.
///
/// Failure sets are unioned into an exclusion set applied to every total
/// and win count. Tier pairing walks the first system's tiers and matches
/// each against the second's via [`match_tier`]; unmatched tiers are
/// skipped, not fatal.
pub fn compare(
  a: &BenchmarkDataset,
  b: &BenchmarkDataset,
  name_a: Option<&str>,
  name_b: Option<&str>,
) -> Comparison {
  let name_a = name_a.map_or_else(|| a.display_name("System 1"), str::to_string);
  let name_b = name_b.map_or_else(|| b.display_name("System 2"), str::to_string);

  let failed_a = detect_failures(&a.result);
  let failed_b = detect_failures(&b.result);
  let exclude: BTreeSet<usize> = failed_a.iter().chain(&failed_b).copied().collect();

  let best_a: Vec<Option<f64>> = a.result.iter().map(|q| best_of(q)).collect();
  let best_b: Vec<Option<f64>> = b.result.iter().map(|q| best_of(q)).collect();

  let total_queries = best_a.len().max(best_b.len());
  let successful_queries = total_queries - exclude.len();

  let total_runtime = |times: &[Option<f64>]| -> f64 {
    times
      .iter()
      .enumerate()
      .filter(|(i, _)| !exclude.contains(i))
      .filter_map(|(_, t)| *t)
      .sum()
  };
  let total_a = total_runtime(&best_a);
  let total_b = total_runtime(&best_b);

  let mut wins_a = 0;
  let mut wins_b = 0;
  for (i, (ta, tb)) in best_a.iter().zip(&best_b).enumerate() {
    if exclude.contains(&i) {
      continue;
    }
    if let (Some(ta), Some(tb)) = (ta, tb) {
      if ta < tb {
        wins_a += 1;
      } else if tb < ta {
        wins_b += 1;
      }
    }
  }

  let storage_a = a.costs.first().map_or(0.0, CostTier::effective_storage_cost);
  let storage_b = b.costs.first().map_or(0.0, CostTier::effective_storage_cost);

  let tiers: Vec<TierComparison> = a
    .costs
    .iter()
    .filter_map(|tier_a| {
      let tier_b = match_tier(&b.costs, &tier_a.tier)?;
      let total_a = tier_total(tier_a, &exclude);
      let total_b = tier_total(tier_b, &exclude);
      Some(TierComparison {
        tier_a: tier_a.tier.clone(),
        tier_b: tier_b.tier.clone(),
        savings: savings(&name_a, total_a, &name_b, total_b),
        total_a,
        total_b,
      })
    })
    .collect();

  let labels_a = winning_labels(&a.result, a.query_labels.as_deref());
  let labels_b = winning_labels(&b.result, b.query_labels.as_deref());

  let queries = (0..total_queries)
    .map(|i| QueryRow {
      index: i,
      best_a: best_a.get(i).copied().flatten(),
      best_b: best_b.get(i).copied().flatten(),
      label_a: labels_a.get(i).cloned().flatten(),
      label_b: labels_b.get(i).cloned().flatten(),
    })
    .collect();

  Comparison {
    storage_savings: savings(&name_a, storage_a, &name_b, storage_b),
    runtime_savings: savings(&name_a, total_a, &name_b, total_b),
    a: SystemSummary {
      name: name_a,
      machine: a.machine.clone(),
      cluster_size: a.cluster_size,
      data_size: a.data_size,
      total_runtime: total_a,
      wins: wins_a,
      failed: failed_a,
      storage_cost: storage_a,
    },
    b: SystemSummary {
      name: name_b,
      machine: b.machine.clone(),
      cluster_size: b.cluster_size,
      data_size: b.data_size,
      total_runtime: total_b,
      wins: wins_b,
      failed: failed_b,
      storage_cost: storage_b,
    },
    excluded: exclude.into_iter().collect(),
    total_queries,
    successful_queries,
    tiers,
    queries,
  }
}
