//! Crossover Core: domain types, SMA indicator, crossover signals, risk-budget
//! sizing, the single-ticker backtest simulator and portfolio aggregation.
//!
//! This crate contains the whole screening and backtesting model:
//! - Domain types (bars, validated price series, positions, trades)
//! - Indicator engine (trailing SMA, precomputed per series)
//! - Signal generator (close-vs-SMA crossover, STRONG_BUY tier, snapshots)
//! - Position sizer (fixed-fractional risk with an allocation cap)
//! - FLAT/LONG simulator with stop-loss precedence and end-of-data handling
//! - Portfolio aggregation over per-ticker results
//! - Price-feed capability trait with CSV and synthetic adapters
//!
//! No threads and no network; the runner crate owns fan-out and output.

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;
pub mod portfolio;
pub mod signals;
pub mod sizers;

pub use config::{CapitalBasis, ConfigError, EndOfData, StrategyConfig};
pub use engine::{analyze, run_backtest, TickerAnalysis, TickerBacktestResult};
pub use portfolio::{aggregate, PortfolioSummary};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the runner's thread pool
    /// is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::PriceSeries>();
        require_sync::<domain::PriceSeries>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();

        // Configuration and components
        require_send::<config::StrategyConfig>();
        require_sync::<config::StrategyConfig>();
        require_send::<indicators::Sma>();
        require_sync::<indicators::Sma>();
        require_send::<indicators::IndicatorSeries>();
        require_sync::<indicators::IndicatorSeries>();
        require_send::<signals::SmaCrossover>();
        require_sync::<signals::SmaCrossover>();
        require_send::<sizers::RiskBudgetSizer>();
        require_sync::<sizers::RiskBudgetSizer>();

        // Results
        require_send::<engine::TickerAnalysis>();
        require_sync::<engine::TickerAnalysis>();
        require_send::<engine::TickerBacktestResult>();
        require_sync::<engine::TickerBacktestResult>();
        require_send::<portfolio::PortfolioSummary>();
        require_sync::<portfolio::PortfolioSummary>();

        // Feeds
        require_send::<data::CsvDirFeed>();
        require_sync::<data::CsvDirFeed>();
        require_send::<data::SyntheticFeed>();
        require_sync::<data::SyntheticFeed>();
        require_send::<data::FeedError>();
    }

    /// Signals see bars, indicator values and the holding flag, nothing else.
    /// Compile-time only: breaks the build if `signal_at` grows another input.
    #[allow(dead_code)]
    fn signal_input_has_no_portfolio_state(
        generator: &signals::SmaCrossover,
        bars: &[domain::Bar],
        sma: &indicators::IndicatorSeries,
    ) -> signals::Signal {
        signals::signal_at(generator, bars, sma, 0, false)
    }
}
