//! Backtesting engine: per-ticker FLAT/LONG replay and its statistics.
//!
//! Indicators are precomputed before the bar walk; the simulator then sees
//! one bar and one signal at a time and never looks ahead.

pub mod metrics;
pub mod replay;
pub mod simulator;
pub mod state;

pub use metrics::{ProfitFactor, TickerBacktestResult};
pub use replay::{analyze, run_backtest, TickerAnalysis};
pub use simulator::{BacktestSimulator, SimulationOutcome};
pub use state::{TickerState, Transition};
