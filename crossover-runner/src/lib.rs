//! Crossover Runner: universe orchestration and reporting.
//!
//! This crate builds on `crossover-core` to provide:
//! - TOML run configuration with a deterministic run id
//! - Parallel per-ticker analysis (rayon) with skip bookkeeping
//! - Portfolio aggregation over the analyzed tickers
//! - Text report, dashboard JSON snapshot and trade tape export

pub mod config;
pub mod reporting;
pub mod result;
pub mod runner;

pub use config::{DataConfig, OutputConfig, RunConfig, RunConfigError, RunId};
pub use reporting::{dashboard_snapshot, render_text_report, save_artifacts, ArtifactPaths};
pub use result::{SkipReason, TickerOutcome, UniverseRunResult};
pub use runner::{
    analyze_ticker, build_feed, resolve_tickers, run_from_config, run_universe, RunError,
};
