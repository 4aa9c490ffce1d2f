//! Typed result of a universe run: the single handoff to reports and dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crossover_core::data::DataSource;
use crossover_core::fingerprint::FullHash;
use crossover_core::signals::Signal;
use crossover_core::{PortfolioSummary, TickerAnalysis};

use crate::config::{RunConfig, RunId};

/// Why a ticker produced no backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientData { required: usize, available: usize },
    FetchFailed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientData {
                required,
                available,
            } => write!(f, "insufficient data ({available} of {required} bars)"),
            SkipReason::FetchFailed { message } => write!(f, "fetch failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickerOutcome {
    Analyzed(Box<TickerAnalysis>),
    Skipped(SkipReason),
}

impl TickerOutcome {
    pub fn analysis(&self) -> Option<&TickerAnalysis> {
        match self {
            TickerOutcome::Analyzed(a) => Some(a),
            TickerOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            TickerOutcome::Analyzed(_) => None,
            TickerOutcome::Skipped(r) => Some(r),
        }
    }

    /// Signal on the latest bar, if the ticker was analyzed.
    pub fn signal(&self) -> Option<Signal> {
        self.analysis().map(|a| a.snapshot.signal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseRunResult {
    pub run_id: RunId,
    pub strategy_hash: FullHash,
    pub generated_at: DateTime<Utc>,
    pub source: DataSource,
    pub config: RunConfig,
    /// Every requested ticker, analyzed or skipped.
    pub outcomes: BTreeMap<String, TickerOutcome>,
    pub tickers_skipped: usize,
    pub summary: PortfolioSummary,
}

impl UniverseRunResult {
    pub fn analyses(&self) -> impl Iterator<Item = &TickerAnalysis> + '_ {
        self.outcomes.values().filter_map(TickerOutcome::analysis)
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|(ticker, o)| o.skip_reason().map(|r| (ticker.as_str(), r)))
    }

    /// Analyses whose latest-bar signal is `signal`, strongest distance from the SMA first.
    pub fn with_signal(&self, signal: Signal) -> Vec<&TickerAnalysis> {
        let mut hits: Vec<&TickerAnalysis> = self
            .analyses()
            .filter(|a| a.snapshot.signal == signal)
            .collect();
        hits.sort_by(|a, b| {
            let da = a.snapshot.distance_from_sma.unwrap_or(0.0).abs();
            let db = b.snapshot.distance_from_sma.unwrap_or(0.0).abs();
            db.total_cmp(&da)
        });
        hits
    }

    /// Analyses by net profit, best first.
    pub fn top_performers(&self, n: usize) -> Vec<&TickerAnalysis> {
        let mut all: Vec<&TickerAnalysis> = self.analyses().collect();
        all.sort_by(|a, b| b.backtest.net_profit.total_cmp(&a.backtest.net_profit));
        all.truncate(n);
        all
    }
}
