//! Interactive HTML explorer generation.
//!
//! Produces a single self-contained HTML file: aggregated data points are
//! embedded as a JSON literal and charted client-side via the Plotly CDN.
//! No server, no build step; the file opens directly in a browser.

use crate::Result;
use crate::collect::DataPoint;
use chrono::Utc;
use std::path::Path;

/// HTML explorer report generator.
pub struct ExplorerReport {
  content: String,
}

impl ExplorerReport {
  /// Render data points into a self-contained HTML document.
  pub fn from_data_points(points: &[DataPoint]) -> Result<Self> {
    let data = serde_json::to_string_pretty(points)?;
    let generated = Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();

    let content = TEMPLATE
      .replace("__DATA__", &data)
      .replace("__GENERATED__", &generated)
      .replace("__VERSION__", env!("CARGO_PKG_VERSION"));

    Ok(Self { content })
  }

  /// Save to an HTML file.
  pub fn save(&self, path: &Path) -> Result<()> {
    std::fs::write(path, &self.content)?;
    Ok(())
  }

  /// Get the HTML content.
  pub fn content(&self) -> &str {
    &self.content
  }
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Benchmark Explorer</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
<style>
  :root {
    --bg: #0f1117;
    --panel: #1a1d27;
    --border: #2a2e3d;
    --text: #e2e4ed;
    --muted: #8a8fa3;
    --accent: #4f8ef7;
  }
  * { box-sizing: border-box; }
  body {
    margin: 0;
    background: var(--bg);
    color: var(--text);
    font-family: -apple-system, "Segoe UI", Roboto, sans-serif;
  }
  header {
    padding: 20px 28px;
    border-bottom: 1px solid var(--border);
    display: flex;
    align-items: baseline;
    gap: 16px;
  }
  header h1 { margin: 0; font-size: 20px; }
  header .meta { color: var(--muted); font-size: 12px; }
  #controls {
    display: flex;
    flex-wrap: wrap;
    gap: 16px;
    padding: 16px 28px;
    border-bottom: 1px solid var(--border);
  }
  .control { display: flex; flex-direction: column; gap: 4px; }
  .control label { font-size: 11px; color: var(--muted); text-transform: uppercase; }
  select, button {
    background: var(--panel);
    color: var(--text);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 6px 10px;
    font-size: 13px;
    cursor: pointer;
  }
  button.active { border-color: var(--accent); color: var(--accent); }
  #stats {
    display: flex;
    flex-wrap: wrap;
    gap: 12px;
    padding: 16px 28px 0;
  }
  .stat {
    background: var(--panel);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 10px 16px;
    min-width: 130px;
  }
  .stat .value { font-size: 20px; font-weight: 600; }
  .stat .label { font-size: 11px; color: var(--muted); }
  #chart { height: 560px; padding: 12px 16px; }
  #empty { padding: 48px; text-align: center; color: var(--muted); display: none; }
</style>
</head>
<body>
<header>
  <h1>Benchmark Explorer</h1>
  <span class="meta">generated __GENERATED__ &middot; v__VERSION__</span>
</header>

<div id="controls">
  <div class="control">
    <label>Scale</label>
    <select id="scale-select"></select>
  </div>
  <div class="control">
    <label>Tier</label>
    <select id="tier-select"></select>
  </div>
  <div class="control">
    <label>View</label>
    <div>
      <button id="view-scatter" class="active">Cost vs Runtime</button>
      <button id="view-runtime">Runtime</button>
      <button id="view-cost">Cost</button>
    </div>
  </div>
  <div class="control">
    <label>Axes</label>
    <div>
      <button id="axis-log" class="active">Log</button>
      <button id="axis-linear">Linear</button>
    </div>
  </div>
</div>

<div id="stats"></div>
<div id="chart"></div>
<div id="empty">No data points match the current selection.</div>

<script>
const DATA = __DATA__;

const VENDOR_COLORS = {
  firebolt: '#f72a30',
  snowflake: '#29b5e8',
  redshift: '#8c4fff',
  bigquery: '#4285f4',
  clickhouse: '#faff69',
  databricks: '#ff3621',
};
const FALLBACK_COLORS = ['#4f8ef7', '#2dd4a8', '#f7b84f', '#e0549b', '#9d6bf2'];

let state = { scale: null, tier: null, view: 'scatter', log: true };

function vendorColor(vendor, i) {
  return VENDOR_COLORS[vendor.toLowerCase()] || FALLBACK_COLORS[i % FALLBACK_COLORS.length];
}

function unique(values) {
  return [...new Set(values)].sort();
}

function tierCost(point, tier) {
  const t = point.tiers.find(t => t.name === tier);
  return t ? t.compute_cost : null;
}

function filtered() {
  return DATA.filter(p => p.scale === state.scale
    && (state.tier === null || p.tiers.some(t => t.name === state.tier)));
}

function pointLabel(p) {
  const parts = [p.system];
  if (p.config && p.config !== p.system) parts.push(p.config);
  if (p.cluster_size > 1) parts.push(p.cluster_size + ' nodes');
  return parts.join(' / ');
}

function renderStats(points) {
  const el = document.getElementById('stats');
  if (!points.length) { el.innerHTML = ''; return; }

  const runtimes = points.map(p => p.runtime).filter(r => r > 0);
  const costs = state.tier === null
    ? []
    : points.map(p => tierCost(p, state.tier)).filter(c => c !== null && c > 0);

  const cards = [
    { label: 'Data points', value: points.length },
    { label: 'Vendors', value: unique(points.map(p => p.vendor)).length },
  ];
  if (runtimes.length) {
    cards.push({ label: 'Fastest run', value: Math.min(...runtimes).toFixed(2) + 's' });
  }
  if (costs.length) {
    cards.push({ label: 'Cheapest run', value: '$' + Math.min(...costs).toFixed(4) });
  }
  el.innerHTML = cards.map(c =>
    '<div class="stat"><div class="value">' + c.value + '</div><div class="label">' + c.label + '</div></div>'
  ).join('');
}

function traces(points) {
  const vendors = unique(points.map(p => p.vendor));
  return vendors.map((vendor, i) => {
    const vp = points.filter(p => p.vendor === vendor);
    const color = vendorColor(vendor, i);
    const labels = vp.map(pointLabel);

    if (state.view === 'scatter') {
      return {
        name: vendor,
        x: vp.map(p => p.runtime),
        y: vp.map(p => tierCost(p, state.tier)),
        text: labels,
        mode: 'markers',
        type: 'scatter',
        marker: { size: 12, color, line: { color: '#fff', width: 1 } },
        hovertemplate: '%{text}<br>runtime %{x:.2f}s<br>cost $%{y:.4f}<extra>' + vendor + '</extra>',
      };
    }
    const y = state.view === 'runtime' ? vp.map(p => p.runtime) : vp.map(p => tierCost(p, state.tier));
    return {
      name: vendor,
      x: labels,
      y,
      type: 'bar',
      marker: { color },
    };
  });
}

function render() {
  const points = filtered();
  renderStats(points);

  const chart = document.getElementById('chart');
  const empty = document.getElementById('empty');
  if (!points.length) {
    chart.style.display = 'none';
    empty.style.display = 'block';
    return;
  }
  chart.style.display = 'block';
  empty.style.display = 'none';

  const axisType = state.log ? 'log' : 'linear';
  const layout = {
    paper_bgcolor: '#0f1117',
    plot_bgcolor: '#0f1117',
    font: { color: '#e2e4ed' },
    margin: { t: 30, r: 20 },
    legend: { orientation: 'h' },
  };
  if (state.view === 'scatter') {
    layout.xaxis = { title: 'Total runtime (s)', type: axisType, gridcolor: '#2a2e3d' };
    layout.yaxis = { title: 'Compute cost ($)', type: axisType, gridcolor: '#2a2e3d' };
  } else {
    layout.xaxis = { gridcolor: '#2a2e3d' };
    layout.yaxis = {
      title: state.view === 'runtime' ? 'Total runtime (s)' : 'Compute cost ($)',
      type: axisType,
      gridcolor: '#2a2e3d',
    };
  }
  Plotly.newPlot(chart, traces(points), layout, { responsive: true, displaylogo: false });
}

function setupControls() {
  const scales = unique(DATA.map(p => p.scale));
  const tiers = unique(DATA.flatMap(p => p.tiers.map(t => t.name)));
  state.scale = scales[0] || null;
  state.tier = tiers[0] || null;

  const scaleSelect = document.getElementById('scale-select');
  scaleSelect.innerHTML = scales.map(s => '<option>' + s + '</option>').join('');
  scaleSelect.onchange = () => { state.scale = scaleSelect.value; render(); };

  const tierSelect = document.getElementById('tier-select');
  tierSelect.innerHTML = tiers.map(t => '<option>' + t + '</option>').join('');
  tierSelect.onchange = () => { state.tier = tierSelect.value; render(); };

  const viewButtons = { 'view-scatter': 'scatter', 'view-runtime': 'runtime', 'view-cost': 'cost' };
  for (const [id, view] of Object.entries(viewButtons)) {
    document.getElementById(id).onclick = () => {
      state.view = view;
      for (const other of Object.keys(viewButtons)) {
        document.getElementById(other).classList.toggle('active', other === id);
      }
      render();
    };
  }

  document.getElementById('axis-log').onclick = () => {
    state.log = true;
    document.getElementById('axis-log').classList.add('active');
    document.getElementById('axis-linear').classList.remove('active');
    render();
  };
  document.getElementById('axis-linear').onclick = () => {
    state.log = false;
    document.getElementById('axis-linear').classList.add('active');
    document.getElementById('axis-log').classList.remove('active');
    render();
  };
}

setupControls();
render();
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
  use super::*;
  use crate::collect::TierCost;
  use tempfile::TempDir;

  fn sample_points() -> Vec<DataPoint> {
    vec![
      DataPoint {
        vendor: "firebolt".to_string(),
        config: "L".to_string(),
        scale: "1B".to_string(),
        runtime: 12.5,
        tiers: vec![TierCost {
          name: "Enterprise".to_string(),
          compute_cost: 0.42,
          storage_cost: 1.5,
        }],
        system: "Firebolt".to_string(),
        machine: "L".to_string(),
        cluster_size: 2,
        data_size: 70_000_000_000,
      },
      DataPoint {
        vendor: "snowflake".to_string(),
        config: "XS".to_string(),
        scale: "1B".to_string(),
        runtime: 30.1,
        tiers: vec![],
        system: "Snowflake".to_string(),
        machine: String::new(),
        cluster_size: 1,
        data_size: 0,
      },
    ]
  }

  #[test]
  fn test_embeds_data() {
    let report = ExplorerReport::from_data_points(&sample_points()).unwrap();
    let content = report.content();

    assert!(content.starts_with("<!DOCTYPE html>"));
    assert!(content.contains(r#""vendor": "firebolt""#));
    assert!(content.contains(r#""vendor": "snowflake""#));
    assert!(content.contains(r#""scale": "1B""#));
    assert!(!content.contains("__DATA__"));
    assert!(!content.contains("__GENERATED__"));
    assert!(!content.contains("__VERSION__"));
  }

  #[test]
  fn test_empty_points_still_valid() {
    let report = ExplorerReport::from_data_points(&[]).unwrap();
    assert!(report.content().contains("const DATA = []"));
  }

  #[test]
  fn test_save() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("explorer.html");

    let report = ExplorerReport::from_data_points(&sample_points()).unwrap();
    report.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Benchmark Explorer"));
  }
}
