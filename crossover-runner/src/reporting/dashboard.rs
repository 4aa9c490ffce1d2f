//! JSON snapshot consumed by the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crossover_core::engine::{ProfitFactor, TickerBacktestResult};
use crossover_core::signals::SignalSnapshot;
use crossover_core::{PortfolioSummary, StrategyConfig};

use crate::result::{SkipReason, UniverseRunResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub config: StrategyConfig,
    pub portfolio_summary: PortfolioSummary,
    pub signals: Vec<TickerSignal>,
    /// Per-ticker results without the trade logs; those go to the trade tape.
    pub backtests: Vec<BacktestDigest>,
    pub skipped: Vec<SkippedTicker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSignal {
    pub ticker: String,
    #[serde(flatten)]
    pub snapshot: SignalSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestDigest {
    pub ticker: String,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: Option<f64>,
    pub net_profit: f64,
    pub avg_pnl_pct: Option<f64>,
    pub profit_factor: ProfitFactor,
    pub stop_loss_exits: usize,
    pub worst_trade_pct: Option<f64>,
    pub bars_analyzed: usize,
}

impl From<&TickerBacktestResult> for BacktestDigest {
    fn from(r: &TickerBacktestResult) -> Self {
        Self {
            ticker: r.ticker.clone(),
            total_trades: r.total_trades,
            winning_trades: r.winning_trades,
            losing_trades: r.losing_trades,
            win_rate: r.win_rate,
            net_profit: r.net_profit,
            avg_pnl_pct: r.avg_pnl_pct,
            profit_factor: r.profit_factor,
            stop_loss_exits: r.stop_loss_exits,
            worst_trade_pct: r.worst_trade_pct,
            bars_analyzed: r.bars_analyzed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

/// Build the dashboard view of a run. Tickers are in symbol order.
pub fn dashboard_snapshot(result: &UniverseRunResult) -> DashboardSnapshot {
    let mut signals = Vec::new();
    let mut backtests = Vec::new();
    for analysis in result.analyses() {
        signals.push(TickerSignal {
            ticker: analysis.backtest.ticker.clone(),
            snapshot: analysis.snapshot.clone(),
        });
        backtests.push(BacktestDigest::from(&analysis.backtest));
    }

    DashboardSnapshot {
        run_id: result.run_id.clone(),
        generated_at: result.generated_at,
        config: result.config.strategy.clone(),
        portfolio_summary: result.summary.clone(),
        signals,
        backtests,
        skipped: result
            .skipped()
            .map(|(ticker, reason)| SkippedTicker {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            })
            .collect(),
    }
}
