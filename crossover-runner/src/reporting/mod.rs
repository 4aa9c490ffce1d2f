//! Consumers of a finished run: text report, dashboard JSON, trade tape.
//!
//! Nothing here feeds back into the analysis.

pub mod artifacts;
pub mod dashboard;
pub mod text;

pub use artifacts::{export_trades_csv, save_artifacts, ArtifactPaths};
pub use dashboard::{dashboard_snapshot, BacktestDigest, DashboardSnapshot, SkippedTicker, TickerSignal};
pub use text::render_text_report;
