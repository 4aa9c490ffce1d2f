//! Plain-text screening report.

use crossover_core::signals::Signal;
use crossover_core::{PortfolioSummary, StrategyConfig, TickerAnalysis};

use crate::result::UniverseRunResult;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";
const SIGNALS_PER_TIER: usize = 10;
const TOP_PERFORMERS: usize = 15;

/// Render the full report: configuration, portfolio summary, current
/// signals per tier and the best backtests.
pub fn render_text_report(result: &UniverseRunResult) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(&format!("{RULE}\n"));
    out.push_str("SMA Crossover Screening & Backtesting Report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("Run: {}\n", &result.run_id[..result.run_id.len().min(12)]));
    out.push_str(&format!("{RULE}\n"));
    out.push('\n');

    write_config(&mut out, &result.config.strategy);
    write_summary(&mut out, &result.summary, result.tickers_skipped);
    write_signals(&mut out, result);
    write_performers(&mut out, result);

    out.push_str(&format!("{RULE}\n"));
    out.push_str("END OF REPORT\n");
    out.push_str(&format!("{RULE}\n"));
    out
}

fn write_config(out: &mut String, strategy: &StrategyConfig) {
    let capital = strategy.initial_capital;
    out.push_str("STRATEGY CONFIGURATION\n");
    out.push_str(&format!("{THIN_RULE}\n"));
    out.push_str(&format!("Indicator: {}-period Simple Moving Average\n", strategy.sma_window));
    out.push_str(&format!("Capital: ${capital:.2}\n"));
    out.push_str(&format!(
        "Max Position Size: {:.1}% (${:.2} per ticker)\n",
        strategy.max_position_fraction * 100.0,
        capital * strategy.max_position_fraction
    ));
    out.push_str(&format!(
        "Risk Per Trade: {:.1}% (${:.2})\n",
        strategy.risk_fraction * 100.0,
        capital * strategy.risk_fraction
    ));
    out.push_str(&format!(
        "Stop-Loss: {} ({:.1}% threshold)\n",
        if strategy.use_stop_loss { "ENABLED" } else { "DISABLED" },
        strategy.stop_loss_fraction * 100.0
    ));
    out.push('\n');
}

fn write_summary(out: &mut String, s: &PortfolioSummary, skipped: usize) {
    out.push_str("PORTFOLIO SUMMARY\n");
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("Tickers Analyzed: {}\n", s.tickers_analyzed));
    out.push_str(&format!("Tickers Skipped: {skipped}\n"));
    out.push_str(&format!(
        "Profitable Tickers: {} ({})\n",
        s.profitable_tickers,
        pct_of(s.profitable_tickers, s.tickers_analyzed)
    ));
    out.push_str(&format!("Unprofitable Tickers: {}\n", s.unprofitable_tickers));
    out.push('\n');
    out.push_str(&format!("Total Trades Simulated: {}\n", s.total_trades));
    out.push_str(&format!(
        "Winning Trades: {} ({})\n",
        s.winning_trades,
        opt_pct(s.overall_win_rate)
    ));
    out.push_str(&format!("Losing Trades: {}\n", s.losing_trades));
    out.push('\n');
    out.push_str(&format!("Gross Profit: ${:.2}\n", s.gross_profit));
    out.push_str(&format!("Gross Loss: ${:.2}\n", s.gross_loss));
    out.push_str(&format!("Net Profit: ${:.2}\n", s.net_profit));
    out.push_str(&format!("Profit Factor: {}\n", s.profit_factor));
    out.push_str(&format!(
        "Avg Trade Return Per Ticker: {}\n",
        opt_pct(s.avg_pnl_pct_per_ticker)
    ));
    out.push('\n');

    match (&s.best_ticker, &s.worst_ticker) {
        (Some(best), Some(worst)) => {
            out.push_str(&format!(
                "Best Performer: {} (${:.2}, {} win rate)\n",
                best.ticker,
                best.net_profit,
                opt_pct(best.win_rate)
            ));
            out.push_str(&format!(
                "Worst Performer: {} (${:.2}, {} win rate)\n",
                worst.ticker,
                worst.net_profit,
                opt_pct(worst.win_rate)
            ));
        }
        _ => {
            out.push_str("Best Performer: n/a\n");
            out.push_str("Worst Performer: n/a\n");
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "Stop-Loss Exits: {} ({})\n",
        s.stop_loss_exits,
        pct_of(s.stop_loss_exits, s.total_trades)
    ));
    out.push_str(&format!(
        "Signal Exits: {} ({})\n",
        s.sma_exits,
        pct_of(s.sma_exits, s.total_trades)
    ));
    out.push_str(&format!(
        "End-of-Data Exits: {} ({})\n",
        s.end_of_data_exits,
        pct_of(s.end_of_data_exits, s.total_trades)
    ));
    out.push_str(&format!("Worst Single Trade: {}\n", opt_pct(s.worst_trade_pct)));
    out.push('\n');
}

fn write_signals(out: &mut String, result: &UniverseRunResult) {
    out.push_str(&format!("{RULE}\n"));
    out.push_str("CURRENT TRADING SIGNALS\n");
    out.push_str(&format!("{RULE}\n"));

    for signal in [Signal::StrongBuy, Signal::Buy, Signal::Sell] {
        let hits = result.with_signal(signal);
        out.push('\n');
        out.push_str(&format!("{} Signals: {}\n", signal, hits.len()));
        out.push_str(&format!("{THIN_RULE}\n"));
        for analysis in hits.iter().take(SIGNALS_PER_TIER) {
            write_signal_line(out, analysis);
        }
    }
    out.push('\n');
}

fn write_signal_line(out: &mut String, analysis: &TickerAnalysis) {
    let snap = &analysis.snapshot;
    out.push_str(&format!(
        "{:<6} | Price: ${:>8.2} | SMA: ${:>8.2} | Distance: {:>7}\n",
        analysis.backtest.ticker,
        snap.close,
        snap.sma.unwrap_or(f64::NAN),
        opt_pct(snap.distance_from_sma)
    ));
    if let Some(pos) = &snap.suggestion {
        out.push_str(&format!(
            "        -> BUY {} shares = ${:.2} | Stop-Loss: ${:.2}\n",
            pos.shares, pos.dollars, pos.stop_loss_price
        ));
    }
}

fn write_performers(out: &mut String, result: &UniverseRunResult) {
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("TOP {TOP_PERFORMERS} BACKTEST PERFORMERS\n"));
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!(
        "{:<8} {:<12} {:<8} {:<8} {:<10} {:<6}\n",
        "Ticker", "Profit", "Trades", "Win%", "Avg%", "PF"
    ));
    out.push_str(&format!("{THIN_RULE}\n"));
    for analysis in result.top_performers(TOP_PERFORMERS) {
        let b = &analysis.backtest;
        out.push_str(&format!(
            "{:<8} {:<12} {:<8} {:<8} {:<10} {:<6}\n",
            b.ticker,
            format!("${:.2}", b.net_profit),
            b.total_trades,
            opt_pct(b.win_rate),
            opt_pct(b.avg_pnl_pct),
            b.profit_factor.to_string()
        ));
    }
    out.push('\n');
}

/// A fraction as a percentage, `n/a` when undefined.
fn opt_pct(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{:.2}%", f * 100.0),
        None => "n/a".to_string(),
    }
}

fn pct_of(part: usize, whole: usize) -> String {
    if whole == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", part as f64 / whole as f64 * 100.0)
    }
}
