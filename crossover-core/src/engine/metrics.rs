//! Per-ticker backtest statistics.
//!
//! Every figure is derived from the closed-trade log after the replay;
//! nothing is accumulated while the simulator runs. Ratios over zero trades are
//! `None` rather than 0 or NaN.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{ExitReason, Position, Trade};
use crate::fingerprint::DatasetHash;

/// Gross profit over gross loss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProfitFactor {
    Ratio(f64),
    /// Profits with no losses at all.
    Unbounded,
    /// Neither profit nor loss (no trades, or only break-even trades).
    Undefined,
}

impl ProfitFactor {
    /// `gross_loss` is a positive magnitude.
    pub fn from_gross(gross_profit: f64, gross_loss: f64) -> Self {
        if gross_loss > 0.0 {
            ProfitFactor::Ratio(gross_profit / gross_loss)
        } else if gross_profit > 0.0 {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::Undefined
        }
    }

    /// Finite ratio, if there is one.
    pub fn ratio(&self) -> Option<f64> {
        match self {
            ProfitFactor::Ratio(r) => Some(*r),
            _ => None,
        }
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Ratio(r) => write!(f, "{r:.2}"),
            ProfitFactor::Unbounded => f.write_str("inf"),
            ProfitFactor::Undefined => f.write_str("n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerBacktestResult {
    pub ticker: String,
    pub trades: Vec<Trade>,

    // ── Counts ──
    pub total_trades: usize,
    pub winning_trades: usize,
    /// Trades with pnl <= 0 (break-even counts as a loss).
    pub losing_trades: usize,
    pub stop_loss_exits: usize,
    pub sma_exits: usize,
    pub end_of_data_exits: usize,
    pub entry_rejections: usize,

    // ── Ratios (None without trades) ──
    pub win_rate: Option<f64>,
    pub avg_win_pct: Option<f64>,
    pub avg_loss_pct: Option<f64>,
    pub avg_profit: Option<f64>,
    pub avg_pnl_pct: Option<f64>,
    pub worst_trade_pct: Option<f64>,

    // ── Dollars ──
    pub gross_profit: f64,
    /// Positive magnitude of the summed losing pnl.
    pub gross_loss: f64,
    pub net_profit: f64,
    pub profit_factor: ProfitFactor,

    pub bars_analyzed: usize,
    pub dataset_hash: DatasetHash,
    /// Only set under `EndOfData::Exclude`; never part of the figures above.
    pub open_position: Option<Position>,
}

impl TickerBacktestResult {
    pub fn from_trades(
        ticker: impl Into<String>,
        trades: Vec<Trade>,
        open_position: Option<Position>,
        entry_rejections: usize,
        bars_analyzed: usize,
        dataset_hash: DatasetHash,
    ) -> Self {
        let total_trades = trades.len();
        let (winners, losers): (Vec<&Trade>, Vec<&Trade>) =
            trades.iter().partition(|t| t.is_winner());

        let gross_profit = winners.iter().fold(0.0, |acc, t| acc + t.pnl_dollars);
        let gross_loss = losers.iter().fold(0.0, |acc, t| acc - t.pnl_dollars);
        let net_profit = gross_profit - gross_loss;

        let count = |reason: ExitReason| trades.iter().filter(|t| t.exit_reason == reason).count();

        Self {
            ticker: ticker.into(),
            total_trades,
            winning_trades: winners.len(),
            losing_trades: losers.len(),
            stop_loss_exits: count(ExitReason::StopLoss),
            sma_exits: count(ExitReason::SmaExit),
            end_of_data_exits: count(ExitReason::EndOfData),
            entry_rejections,
            win_rate: ratio(winners.len() as f64, total_trades),
            avg_win_pct: mean(winners.iter().map(|t| t.pnl_pct)),
            avg_loss_pct: mean(losers.iter().map(|t| t.pnl_pct)),
            avg_profit: ratio(net_profit, total_trades),
            avg_pnl_pct: mean(trades.iter().map(|t| t.pnl_pct)),
            worst_trade_pct: trades.iter().map(|t| t.pnl_pct).reduce(f64::min),
            gross_profit,
            gross_loss,
            net_profit,
            profit_factor: ProfitFactor::from_gross(gross_profit, gross_loss),
            bars_analyzed,
            dataset_hash,
            open_position,
            trades,
        }
    }

    pub fn has_trades(&self) -> bool {
        self.total_trades > 0
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0.0
    }
}

fn ratio(numerator: f64, n: usize) -> Option<f64> {
    (n > 0).then(|| numerator / n as f64)
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    ratio(sum, n)
}
