//! Markdown comparison report generation.

use crate::Result;
use crate::aggregate::{Comparison, Savings};
use chrono::Utc;
use std::fmt::Write as _;
use std::path::Path;

/// Markdown report generator.
///
/// A pure mapping from a [`Comparison`] to a report string; writing the
/// file is the caller's concern via [`MarkdownReport::save`].
pub struct MarkdownReport {
  content: String,
}

impl MarkdownReport {
  /// Render a comparison into a markdown document.
  pub fn from_comparison(comparison: &Comparison) -> Self {
    let mut content = String::new();

    Self::write_header(&mut content, comparison);
    Self::write_configuration(&mut content, comparison);
    Self::write_performance(&mut content, comparison);
    Self::write_failed_queries(&mut content, comparison);
    Self::write_storage(&mut content, comparison);
    Self::write_tiers(&mut content, comparison);
    Self::write_summary(&mut content, comparison);
    Self::write_query_details(&mut content, comparison);

    Self { content }
  }

  fn write_header(out: &mut String, c: &Comparison) {
    let _ = writeln!(out, "# Cost Comparison: {} vs {}", c.a.name, c.b.name);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Generated:** {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "**Version:** {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out);
  }

  fn write_configuration(out: &mut String, c: &Comparison) {
    let _ = writeln!(out, "## Configuration");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | {} | {} |", c.a.name, c.b.name);
    let _ = writeln!(out, "|--------|---|---|");
    let _ = writeln!(
      out,
      "| Cluster Size | {} | {} |",
      fmt_opt(c.a.cluster_size),
      fmt_opt(c.b.cluster_size)
    );
    let _ = writeln!(
      out,
      "| Machine/Engine | {} | {} |",
      c.a.machine.as_deref().unwrap_or("N/A"),
      c.b.machine.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(
      out,
      "| Data Size (GB) | {} | {} |",
      fmt_gb(c.a.data_size),
      fmt_gb(c.b.data_size)
    );
    let _ = writeln!(out);
  }

  fn write_performance(out: &mut String, c: &Comparison) {
    let _ = writeln!(
      out,
      "## Performance (Best of 3 runs, {}/{} queries)",
      c.successful_queries, c.total_queries
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | {} | {} |", c.a.name, c.b.name);
    let _ = writeln!(out, "|--------|---|---|");
    let _ = writeln!(
      out,
      "| Total Query Time | {:.3}s | {:.3}s |",
      c.a.total_runtime, c.b.total_runtime
    );
    let _ = writeln!(out, "| Queries Won | {} | {} |", c.a.wins, c.b.wins);
    let _ = writeln!(out);
  }

  fn write_failed_queries(out: &mut String, c: &Comparison) {
    if c.a.failed.is_empty() && c.b.failed.is_empty() {
      return;
    }

    let _ = writeln!(out, "## Failed Queries");
    let _ = writeln!(out);
    for (name, failed) in [(&c.a.name, &c.a.failed), (&c.b.name, &c.b.failed)] {
      if !failed.is_empty() {
        let labels: Vec<String> = failed.iter().map(|i| format!("Q{}", i + 1)).collect();
        let _ = writeln!(out, "- **{}**: {}", name, labels.join(", "));
      }
    }
    let _ = writeln!(out);
  }

  fn write_storage(out: &mut String, c: &Comparison) {
    let _ = writeln!(out, "## Storage Cost (Monthly)");
    let _ = writeln!(out);
    let _ = writeln!(out, "| System | Cost |");
    let _ = writeln!(out, "|--------|------|");
    let _ = writeln!(out, "| {} | ${:.4} |", c.a.name, c.a.storage_cost);
    let _ = writeln!(out, "| {} | ${:.4} |", c.b.name, c.b.storage_cost);
    if let Some(ref s) = c.storage_savings {
      let _ = writeln!(out, "| **Savings** | **{} saves {:.1}%** |", s.winner, s.percent);
    }
    let _ = writeln!(out);
  }

  fn write_tiers(out: &mut String, c: &Comparison) {
    for tier in &c.tiers {
      let _ = writeln!(
        out,
        "## Compute Cost - {} Tier ({} queries)",
        tier.label(),
        c.successful_queries
      );
      let _ = writeln!(out);
      let _ = writeln!(out, "| System | Cost |");
      let _ = writeln!(out, "|--------|------|");
      let _ = writeln!(out, "| {} ({}) | ${:.6} |", c.a.name, tier.tier_a, tier.total_a);
      let _ = writeln!(out, "| {} ({}) | ${:.6} |", c.b.name, tier.tier_b, tier.total_b);
      if let Some(ref s) = tier.savings {
        let _ = writeln!(out, "| **Savings** | **{} saves {:.1}%** |", s.winner, s.percent);
      }
      let _ = writeln!(out);
    }
  }

  fn write_summary(out: &mut String, c: &Comparison) {
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Category | Winner | Savings |");
    let _ = writeln!(out, "|----------|--------|---------|");

    Self::write_summary_row(
      out,
      "Storage",
      &c.storage_savings,
      c.a.storage_cost > 0.0 && c.b.storage_cost > 0.0,
      "",
    );

    for tier in &c.tiers {
      Self::write_summary_row(
        out,
        &format!("Compute ({})", tier.label()),
        &tier.savings,
        tier.total_a > 0.0 && tier.total_b > 0.0,
        "",
      );
    }

    Self::write_summary_row(
      out,
      "Query Performance",
      &c.runtime_savings,
      c.a.total_runtime > 0.0 && c.b.total_runtime > 0.0,
      " faster",
    );

    let _ = writeln!(out);
  }

  /// One summary row: the winner with its percentage, a tie when both
  /// figures were positive but equal, nothing otherwise.
  fn write_summary_row(out: &mut String, category: &str, savings: &Option<Savings>, scorable: bool, suffix: &str) {
    match savings {
      Some(s) => {
        let _ = writeln!(out, "| {} | {} | {:.1}%{} |", category, s.winner, s.percent, suffix);
      }
      None if scorable => {
        let _ = writeln!(out, "| {} | Tie | 0% |", category);
      }
      None => {}
    }
  }

  fn write_query_details(out: &mut String, c: &Comparison) {
    let _ = writeln!(out, "## Query Details");
    let _ = writeln!(out);

    let has_labels_a = c.queries.iter().any(|q| q.label_a.is_some());
    let has_labels_b = c.queries.iter().any(|q| q.label_b.is_some());

    let mut header = format!("| Query | {} Best | {} Best |", c.a.name, c.b.name);
    let mut rule = "|-------|---|---|".to_string();
    if has_labels_a {
      header.push_str(&format!(" {} Label |", c.a.name));
      rule.push_str("---|");
    }
    if has_labels_b {
      header.push_str(&format!(" {} Label |", c.b.name));
      rule.push_str("---|");
    }
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", rule);

    for q in &c.queries {
      let mut row = format!("| Q{} | {} | {} |", q.index + 1, fmt_time(q.best_a), fmt_time(q.best_b));
      if has_labels_a {
        row.push_str(&format!(" {} |", q.label_a.as_deref().unwrap_or("N/A")));
      }
      if has_labels_b {
        row.push_str(&format!(" {} |", q.label_b.as_deref().unwrap_or("N/A")));
      }
      let _ = writeln!(out, "{}", row);
    }
    let _ = writeln!(out);
  }

  /// Save to a markdown file.
  pub fn save(&self, path: &Path) -> Result<()> {
    std::fs::write(path, &self.content)?;
    Ok(())
  }

  /// Get the markdown content.
  pub fn content(&self) -> &str {
    &self.content
  }
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
  value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn fmt_gb(bytes: Option<u64>) -> String {
  bytes.map_or_else(|| "N/A".to_string(), |b| format!("{:.2}", b as f64 / 1e9))
}

fn fmt_time(time: Option<f64>) -> String {
  time.map_or_else(|| "FAIL".to_string(), |t| format!("{:.3}", t))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregate::compare;
  use crate::dataset::{BenchmarkDataset, CostTier};
  use tempfile::TempDir;

  fn sample_comparison() -> Comparison {
    let a = BenchmarkDataset {
      system: Some("Alpha".to_string()),
      machine: Some("m6i.8xlarge".to_string()),
      cluster_size: Some(3),
      data_size: Some(70_000_000_000),
      result: vec![
        vec![Some(1.0), Some(0.9), Some(1.1)],
        vec![Some(2.0), Some(2.5), None],
        vec![None, None, None],
      ],
      query_labels: None,
      costs: vec![CostTier {
        tier: "Enterprise".to_string(),
        compute_costs: vec![
          vec![Some(0.01), Some(0.02), Some(0.015)],
          vec![Some(0.05), None, None],
          vec![None, None, None],
        ],
        storage_cost: 10.0,
        storage_costs: vec![],
      }],
    };
    let b = BenchmarkDataset {
      system: Some("Beta".to_string()),
      machine: Some("L".to_string()),
      cluster_size: Some(2),
      data_size: Some(68_000_000_000),
      result: vec![
        vec![Some(1.5), Some(1.4), Some(1.6)],
        vec![Some(1.0), Some(1.2), None],
        vec![Some(3.0), None, None],
      ],
      query_labels: Some(vec![
        vec![Some("cold".to_string()), Some("warm".to_string()), Some("warm".to_string())],
        vec![Some("cold".to_string()), Some("warm".to_string()), None],
        vec![Some("cold".to_string()), None, None],
      ]),
      costs: vec![CostTier {
        tier: "Enterprise".to_string(),
        compute_costs: vec![
          vec![Some(0.02), Some(0.03), None],
          vec![Some(0.01), None, None],
          vec![Some(0.1), None, None],
        ],
        storage_cost: 8.0,
        storage_costs: vec![],
      }],
    };

    compare(&a, &b, None, None)
  }

  #[test]
  fn test_report_sections() {
    let report = MarkdownReport::from_comparison(&sample_comparison());
    let content = report.content();

    assert!(content.contains("# Cost Comparison: Alpha vs Beta"));
    assert!(content.contains("## Configuration"));
    assert!(content.contains("## Performance (Best of 3 runs, 2/3 queries)"));
    assert!(content.contains("## Failed Queries"));
    assert!(content.contains("- **Alpha**: Q3"));
    assert!(content.contains("## Storage Cost (Monthly)"));
    assert!(content.contains("## Compute Cost - Enterprise Tier (2 queries)"));
    assert!(content.contains("## Summary"));
    assert!(content.contains("## Query Details"));
  }

  #[test]
  fn test_storage_savings_row() {
    let report = MarkdownReport::from_comparison(&sample_comparison());
    // 10 vs 8: Beta saves 20.0%
    assert!(report.content().contains("**Beta saves 20.0%**"));
  }

  #[test]
  fn test_query_details_fail_marker_and_labels() {
    let report = MarkdownReport::from_comparison(&sample_comparison());
    let content = report.content();

    // Query 3 failed in Alpha, best shown for Beta with its winning label
    assert!(content.contains("| Q3 | FAIL | 3.000 | cold |"));
    // Beta has labels, Alpha does not: exactly one label column
    assert!(content.contains("| Query | Alpha Best | Beta Best | Beta Label |"));
  }

  #[test]
  fn test_self_comparison_renders_ties() {
    let a = BenchmarkDataset {
      system: Some("Alpha".to_string()),
      machine: None,
      cluster_size: None,
      data_size: None,
      result: vec![vec![Some(1.0), Some(0.9), Some(1.1)]],
      query_labels: None,
      costs: vec![CostTier {
        tier: "Standard".to_string(),
        compute_costs: vec![vec![Some(0.01), None, None]],
        storage_cost: 5.0,
        storage_costs: vec![],
      }],
    };
    let comparison = compare(&a, &a, Some("Left"), Some("Right"));
    let report = MarkdownReport::from_comparison(&comparison);
    let content = report.content();

    assert!(content.contains("| Storage | Tie | 0% |"));
    assert!(content.contains("| Compute (Standard) | Tie | 0% |"));
    assert!(content.contains("| Query Performance | Tie | 0% |"));
    assert!(!content.contains("saves"));
  }

  #[test]
  fn test_save() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("comparison.md");

    let report = MarkdownReport::from_comparison(&sample_comparison());
    report.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("# Cost Comparison"));
  }
}
