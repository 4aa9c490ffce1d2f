//! Full-history replay of one ticker.
//!
//! The SMA is precomputed once; the bar walk then feeds each bar's signal
//! into the simulator using the holding state going into that bar.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::domain::PriceSeries;
use crate::fingerprint::dataset_hash;
use crate::indicators::{IndicatorSeries, InsufficientData, Sma};
use crate::signals::{signal_at, SignalSnapshot, SmaCrossover};
use crate::sizers::RiskBudgetSizer;

use super::metrics::TickerBacktestResult;
use super::simulator::BacktestSimulator;

/// Everything computed for one ticker: the screening view of the latest bar
/// and the historical backtest that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerAnalysis {
    pub snapshot: SignalSnapshot,
    pub backtest: TickerBacktestResult,
}

/// Backtest `series` under `config`.
///
/// `config` is assumed validated. Needs `sma_window + 1` bars.
pub fn run_backtest(
    series: &PriceSeries,
    config: &StrategyConfig,
) -> Result<TickerBacktestResult, InsufficientData> {
    let sma = precompute(series, config)?;
    let (result, _) = replay(series, config, &sma);
    Ok(result)
}

/// Backtest `series` and snapshot its latest bar.
pub fn analyze(
    series: &PriceSeries,
    config: &StrategyConfig,
) -> Result<TickerAnalysis, InsufficientData> {
    let sma = precompute(series, config)?;
    let (backtest, into_last) = replay(series, config, &sma);
    let snapshot = SignalSnapshot::latest(
        series,
        &sma,
        &SmaCrossover::from_config(config),
        &RiskBudgetSizer::from_config(config),
        into_last.capital,
        into_last.holding,
    );
    Ok(TickerAnalysis { snapshot, backtest })
}

fn precompute(
    series: &PriceSeries,
    config: &StrategyConfig,
) -> Result<IndicatorSeries, InsufficientData> {
    let required = config.min_series_len();
    if series.len() < required {
        return Err(InsufficientData {
            required,
            available: series.len(),
        });
    }
    Sma::new(config.sma_window).compute(series)
}

/// Simulator state going into the last bar.
struct LastBarState {
    holding: bool,
    capital: f64,
}

fn replay(
    series: &PriceSeries,
    config: &StrategyConfig,
    sma: &IndicatorSeries,
) -> (TickerBacktestResult, LastBarState) {
    let bars = series.bars();
    let generator = SmaCrossover::from_config(config);
    let mut sim = BacktestSimulator::new(series.ticker(), config);
    let mut into_last = LastBarState {
        holding: false,
        capital: sim.sizing_capital(),
    };

    // bar 0 has no previous bar and can never cross
    for (i, bar) in bars.iter().enumerate().skip(1) {
        let holding = sim.is_long();
        if i == bars.len() - 1 {
            into_last = LastBarState {
                holding,
                capital: sim.sizing_capital(),
            };
        }
        let signal = signal_at(&generator, bars, sma, i, holding);
        sim.step(i, bar, signal);
    }

    let last_index = bars.len() - 1;
    let outcome = sim.finish(last_index, series.last());
    tracing::debug!(
        ticker = series.ticker(),
        trades = outcome.trades.len(),
        rejections = outcome.entry_rejections,
        "replay finished"
    );

    let result = TickerBacktestResult::from_trades(
        series.ticker(),
        outcome.trades,
        outcome.open_position,
        outcome.entry_rejections,
        bars.len(),
        dataset_hash(series),
    );
    (result, into_last)
}
