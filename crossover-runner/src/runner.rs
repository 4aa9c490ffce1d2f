//! Universe runner: fetch, analyze and aggregate a ticker list.
//!
//! Each ticker is independent, so the per-ticker work fans out over rayon.
//! The collect is the barrier; aggregation only starts once every ticker
//! has produced an outcome, and it folds them in input order.

use rayon::prelude::*;
use thiserror::Error;

use crossover_core::data::{
    load_tickers, normalize_tickers, CsvDirFeed, PriceFeed, SyntheticFeed, UniverseError,
};
use crossover_core::indicators::InsufficientData;
use crossover_core::{aggregate, analyze, TickerBacktestResult};

use crate::config::{DataConfig, RunConfig, RunConfigError};
use crate::result::{SkipReason, TickerOutcome, UniverseRunResult};

/// Errors that abort a run before any ticker is simulated.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid run configuration: {0}")]
    Config(#[from] RunConfigError),

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("no tickers: set data.tickers or data.tickers_file")]
    NoTickers,

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Fetch and analyze one ticker. Never fails: problems become a skip.
pub fn analyze_ticker(ticker: &str, feed: &dyn PriceFeed, config: &RunConfig) -> TickerOutcome {
    let series = match feed.fetch_series(ticker, config.data.start_date, config.data.end_date) {
        Ok(series) => series,
        Err(e) => {
            tracing::warn!(ticker, feed = feed.name(), error = %e, "skipping ticker: fetch failed");
            return TickerOutcome::Skipped(SkipReason::FetchFailed {
                message: e.to_string(),
            });
        }
    };

    match analyze(&series, &config.strategy) {
        Ok(analysis) => TickerOutcome::Analyzed(Box::new(analysis)),
        Err(InsufficientData {
            required,
            available,
        }) => {
            tracing::warn!(ticker, required, available, "skipping ticker: insufficient data");
            TickerOutcome::Skipped(SkipReason::InsufficientData {
                required,
                available,
            })
        }
    }
}

/// Analyze every ticker and aggregate the ones that produced a backtest.
///
/// Symbols go through the same checks as a ticker file, so nothing
/// path-like reaches the feed. Duplicates are analyzed once. Ties in the portfolio summary's
/// best/worst ticker go to the earlier symbol in `tickers`.
pub fn run_universe(
    tickers: &[String],
    feed: &dyn PriceFeed,
    config: &RunConfig,
) -> Result<UniverseRunResult, RunError> {
    config.validate()?;

    if tickers.is_empty() {
        return Err(RunError::NoTickers);
    }
    let tickers = normalize_tickers(tickers)?;

    let run_id = config.run_id();
    tracing::info!(
        run_id = &run_id[..12],
        tickers = tickers.len(),
        feed = feed.name(),
        sma_window = config.strategy.sma_window,
        "starting universe run"
    );

    let outcomes: Vec<(String, TickerOutcome)> = match config.threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| fan_out(&tickers, feed, config))
        }
        None => fan_out(&tickers, feed, config),
    };

    let backtests: Vec<TickerBacktestResult> = outcomes
        .iter()
        .filter_map(|(_, o)| o.analysis().map(|a| a.backtest.clone()))
        .collect();
    let summary = aggregate(&backtests);
    let tickers_skipped = outcomes.len() - backtests.len();

    tracing::info!(
        analyzed = summary.tickers_analyzed,
        skipped = tickers_skipped,
        trades = summary.total_trades,
        net_profit = summary.net_profit,
        "universe run finished"
    );

    Ok(UniverseRunResult {
        run_id,
        strategy_hash: config.strategy.full_hash(),
        generated_at: chrono::Utc::now(),
        source: feed.source(),
        config: config.clone(),
        outcomes: outcomes.into_iter().collect(),
        tickers_skipped,
        summary,
    })
}

fn fan_out(tickers: &[String], feed: &dyn PriceFeed, config: &RunConfig) -> Vec<(String, TickerOutcome)> {
    tickers
        .par_iter()
        .map(|ticker| (ticker.clone(), analyze_ticker(ticker, feed, config)))
        .collect()
}

/// Tickers named in the config: the inline list if present, else the file.
pub fn resolve_tickers(data: &DataConfig) -> Result<Vec<String>, RunError> {
    if !data.tickers.is_empty() {
        return Ok(normalize_tickers(&data.tickers)?);
    }
    match &data.tickers_file {
        Some(path) => Ok(load_tickers(path)?),
        None => Err(RunError::NoTickers),
    }
}

/// The feed the config asks for.
pub fn build_feed(data: &DataConfig) -> Box<dyn PriceFeed> {
    if data.synthetic {
        let (start, end) = data.synthetic_range();
        Box::new(SyntheticFeed::new(start, end))
    } else {
        Box::new(CsvDirFeed::new(data.data_dir.clone()))
    }
}

/// Resolve tickers, build the feed and run.
pub fn run_from_config(config: &RunConfig) -> Result<UniverseRunResult, RunError> {
    config.validate()?;
    let tickers = resolve_tickers(&config.data)?;
    let feed = build_feed(&config.data);
    run_universe(&tickers, feed.as_ref(), config)
}
