//! Report generation for aggregated benchmark results.
//!
//! - Markdown: human-readable two-system comparison
//! - Explorer: self-contained HTML document embedding many aggregated
//!   data points for interactive charting

mod explorer;
mod markdown;

pub use explorer::ExplorerReport;
pub use markdown::MarkdownReport;
