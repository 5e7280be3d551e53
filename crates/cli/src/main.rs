//! Command-line interface for benchmark cost reporting.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use costbench_core::{BenchmarkDataset, ExplorerReport, MarkdownReport, collect_data_points, compare};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "costbench", version, about = "Cost/performance reporting for benchmark results")]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compare two benchmark result files and produce a markdown report
  Compare {
    /// First result file
    file1: PathBuf,
    /// Second result file
    file2: PathBuf,
    /// Display name override for the first system
    #[arg(long)]
    name1: Option<String>,
    /// Display name override for the second system
    #[arg(long)]
    name2: Option<String>,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Build an interactive HTML explorer from a results directory tree
  Explorer {
    /// Directory containing `<vendor>/results_<scale>/*.json`
    base_dir: PathBuf,
    /// Output HTML file
    #[arg(short, long, default_value = "benchmark_explorer.html")]
    output: PathBuf,
  },
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let level = if cli.verbose {
    tracing::Level::DEBUG
  } else {
    tracing::Level::INFO
  };
  tracing_subscriber::fmt()
    .with_max_level(level)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();

  match cli.command {
    Commands::Compare {
      file1,
      file2,
      name1,
      name2,
      output,
    } => run_compare(&file1, &file2, name1.as_deref(), name2.as_deref(), output.as_deref()),
    Commands::Explorer { base_dir, output } => run_explorer(&base_dir, &output),
  }
}

fn run_compare(
  file1: &std::path::Path,
  file2: &std::path::Path,
  name1: Option<&str>,
  name2: Option<&str>,
  output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
  let a = BenchmarkDataset::load(file1).with_context(|| format!("failed to load {}", file1.display()))?;
  let b = BenchmarkDataset::load(file2).with_context(|| format!("failed to load {}", file2.display()))?;

  let comparison = compare(&a, &b, name1, name2);
  let report = MarkdownReport::from_comparison(&comparison);

  match output {
    Some(path) => {
      report
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
      info!("report written to {}", path.display());
    }
    None => print!("{}", report.content()),
  }

  Ok(())
}

fn run_explorer(base_dir: &std::path::Path, output: &std::path::Path) -> anyhow::Result<()> {
  if !base_dir.is_dir() {
    bail!("{} is not a directory", base_dir.display());
  }

  let points = collect_data_points(base_dir).with_context(|| format!("failed to scan {}", base_dir.display()))?;
  if points.is_empty() {
    bail!("no result files found under {}", base_dir.display());
  }
  info!("collected {} data points", points.len());

  let report = ExplorerReport::from_data_points(&points)?;
  report
    .save(output)
    .with_context(|| format!("failed to write {}", output.display()))?;
  info!("explorer written to {}", output.display());

  Ok(())
}
