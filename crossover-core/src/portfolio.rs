//! Portfolio aggregation: a pure fold over per-ticker backtest results.

use serde::{Deserialize, Serialize};

use crate::engine::metrics::mean;
use crate::engine::{ProfitFactor, TickerBacktestResult};

/// One ticker's headline numbers, used for best/worst performer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPerformance {
    pub ticker: String,
    pub net_profit: f64,
    pub win_rate: Option<f64>,
    pub total_trades: usize,
}

impl TickerPerformance {
    fn of(result: &TickerBacktestResult) -> Self {
        Self {
            ticker: result.ticker.clone(),
            net_profit: result.net_profit,
            win_rate: result.win_rate,
            total_trades: result.total_trades,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub tickers_analyzed: usize,
    pub profitable_tickers: usize,
    pub unprofitable_tickers: usize,

    // ── Trades ──
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub overall_win_rate: Option<f64>,
    pub stop_loss_exits: usize,
    pub sma_exits: usize,
    pub end_of_data_exits: usize,

    // ── Dollars ──
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_profit: f64,
    pub profit_factor: ProfitFactor,

    /// Mean of per-ticker average trade return, over tickers that traded.
    pub avg_pnl_pct_per_ticker: Option<f64>,
    pub worst_trade_pct: Option<f64>,

    pub best_ticker: Option<TickerPerformance>,
    pub worst_ticker: Option<TickerPerformance>,
}

impl PortfolioSummary {
    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0.0
    }
}

/// Fold per-ticker results into a portfolio summary.
///
/// Ties for best/worst ticker go to the first in input order.
pub fn aggregate(results: &[TickerBacktestResult]) -> PortfolioSummary {
    let mut summary = PortfolioSummary {
        tickers_analyzed: results.len(),
        profitable_tickers: 0,
        unprofitable_tickers: 0,
        total_trades: 0,
        winning_trades: 0,
        losing_trades: 0,
        overall_win_rate: None,
        stop_loss_exits: 0,
        sma_exits: 0,
        end_of_data_exits: 0,
        gross_profit: 0.0,
        gross_loss: 0.0,
        net_profit: 0.0,
        profit_factor: ProfitFactor::Undefined,
        avg_pnl_pct_per_ticker: None,
        worst_trade_pct: None,
        best_ticker: None,
        worst_ticker: None,
    };

    let mut best: Option<&TickerBacktestResult> = None;
    let mut worst: Option<&TickerBacktestResult> = None;

    for r in results {
        if r.is_profitable() {
            summary.profitable_tickers += 1;
        } else {
            summary.unprofitable_tickers += 1;
        }
        summary.total_trades += r.total_trades;
        summary.winning_trades += r.winning_trades;
        summary.losing_trades += r.losing_trades;
        summary.stop_loss_exits += r.stop_loss_exits;
        summary.sma_exits += r.sma_exits;
        summary.end_of_data_exits += r.end_of_data_exits;
        summary.gross_profit += r.gross_profit;
        summary.gross_loss += r.gross_loss;
        summary.net_profit += r.net_profit;

        summary.worst_trade_pct = match (summary.worst_trade_pct, r.worst_trade_pct) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        if best.map_or(true, |b| r.net_profit > b.net_profit) {
            best = Some(r);
        }
        if worst.map_or(true, |w| r.net_profit < w.net_profit) {
            worst = Some(r);
        }
    }

    if summary.total_trades > 0 {
        summary.overall_win_rate =
            Some(summary.winning_trades as f64 / summary.total_trades as f64);
    }
    summary.profit_factor = ProfitFactor::from_gross(summary.gross_profit, summary.gross_loss);
    summary.avg_pnl_pct_per_ticker = mean(results.iter().filter_map(|r| r.avg_pnl_pct));
    summary.best_ticker = best.map(TickerPerformance::of);
    summary.worst_ticker = worst.map(TickerPerformance::of);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExitReason, Trade};
    use crate::fingerprint::DatasetHash;
    use chrono::NaiveDate;

    fn trade(pnl_dollars: f64, reason: ExitReason) -> Trade {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        Trade {
            ticker: "X".into(),
            entry_bar: 0,
            entry_date: d,
            entry_price: 100.0,
            exit_bar: 1,
            exit_date: d,
            exit_price: 100.0 + pnl_dollars,
            shares: 1,
            pnl_dollars,
            pnl_pct: pnl_dollars / 100.0,
            exit_reason: reason,
        }
    }

    fn ticker(name: &str, trades: Vec<Trade>) -> TickerBacktestResult {
        TickerBacktestResult::from_trades(name, trades, None, 0, 50, DatasetHash::from_bytes(name.as_bytes()))
    }

    #[test]
    fn sums_and_partitions_tickers() {
        // +500 over 10 trades, -100 over 5 trades
        let a = ticker("AAA", (0..10).map(|_| trade(50.0, ExitReason::SmaExit)).collect());
        let b = ticker("BBB", (0..5).map(|_| trade(-20.0, ExitReason::StopLoss)).collect());
        let summary = aggregate(&[a, b]);

        assert_eq!(summary.net_profit, 400.0);
        assert_eq!(summary.total_trades, 15);
        assert_eq!(summary.profitable_tickers, 1);
        assert_eq!(summary.unprofitable_tickers, 1);
        assert_eq!(summary.stop_loss_exits, 5);
        assert_eq!(summary.sma_exits, 10);
        assert_eq!(summary.best_ticker.as_ref().unwrap().ticker, "AAA");
        assert_eq!(summary.worst_ticker.as_ref().unwrap().ticker, "BBB");
        assert_eq!(summary.profit_factor, ProfitFactor::Ratio(5.0));
        assert_eq!(summary.worst_trade_pct, Some(-0.2));
        assert!(summary.is_profitable());
    }

    #[test]
    fn empty_input() {
        let summary = aggregate(&[]);
        assert_eq!(summary.tickers_analyzed, 0);
        assert_eq!(summary.net_profit, 0.0);
        assert!(summary.best_ticker.is_none());
        assert!(summary.overall_win_rate.is_none());
        assert!(!summary.is_profitable());
    }

    #[test]
    fn zero_net_ticker_is_unprofitable() {
        let summary = aggregate(&[ticker("FLAT", Vec::new())]);
        assert_eq!(summary.profitable_tickers, 0);
        assert_eq!(summary.unprofitable_tickers, 1);
        assert!(summary.avg_pnl_pct_per_ticker.is_none());
    }

    #[test]
    fn ties_go_to_first_ticker() {
        let a = ticker("FIRST", vec![trade(10.0, ExitReason::SmaExit)]);
        let b = ticker("SECOND", vec![trade(10.0, ExitReason::SmaExit)]);
        let summary = aggregate(&[a, b]);
        assert_eq!(summary.best_ticker.unwrap().ticker, "FIRST");
        assert_eq!(summary.worst_ticker.unwrap().ticker, "FIRST");
    }

    #[test]
    fn inputs_are_untouched() {
        let results = vec![ticker("AAA", vec![trade(5.0, ExitReason::SmaExit)])];
        let before = results.clone();
        let _ = aggregate(&results);
        assert_eq!(results, before);
    }
}
