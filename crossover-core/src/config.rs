//! Strategy configuration passed explicitly into every component.
//!
//! One `StrategyConfig` fully determines a replay. Parallel runs with
//! different parameter sets each own their own copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wholesale misconfiguration. Rejects a run before any simulation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("sma_window must be >= 1 (got {0})")]
    InvalidWindow(usize),

    #[error("{field} must lie in (0, 1) (got {value})")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("initial_capital must be positive and finite (got {0})")]
    InvalidCapital(f64),

    #[error("strong_buy_threshold must be finite and >= 0 (got {0})")]
    InvalidThreshold(f64),
}

/// Which capital figure feeds the position sizer on each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalBasis {
    /// Always size against `initial_capital`.
    #[default]
    Fixed,
    /// Size against `initial_capital` plus realized PnL of this ticker.
    Compounding,
}

/// What happens to a position still open after the final bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfData {
    /// Close at the final close with `ExitReason::EndOfData`; counted in statistics.
    #[default]
    ForceClose,
    /// Leave open; reported separately and excluded from closed-trade statistics.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub sma_window: usize,
    pub stop_loss_fraction: f64,
    pub use_stop_loss: bool,
    pub max_position_fraction: f64,
    pub risk_fraction: f64,
    pub initial_capital: f64,
    /// Minimum `(close - sma) / sma` on a crossover bar for the STRONG_BUY label.
    pub strong_buy_threshold: f64,
    pub capital_basis: CapitalBasis,
    pub end_of_data: EndOfData,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            sma_window: 20,
            stop_loss_fraction: 0.05,
            use_stop_loss: true,
            max_position_fraction: 0.10,
            risk_fraction: 0.02,
            initial_capital: 10_000.0,
            strong_buy_threshold: 0.02,
            capital_basis: CapitalBasis::Fixed,
            end_of_data: EndOfData::ForceClose,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sma_window == 0 {
            return Err(ConfigError::InvalidWindow(self.sma_window));
        }
        check_fraction("stop_loss_fraction", self.stop_loss_fraction)?;
        check_fraction("max_position_fraction", self.max_position_fraction)?;
        check_fraction("risk_fraction", self.risk_fraction)?;
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(ConfigError::InvalidCapital(self.initial_capital));
        }
        if !self.strong_buy_threshold.is_finite() || self.strong_buy_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.strong_buy_threshold));
        }
        Ok(())
    }

    /// Shortest history that can produce a crossover: one full window plus
    /// the previous bar it is compared against.
    pub fn min_series_len(&self) -> usize {
        self.sma_window + 1
    }
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons and is rejected here too
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, value })
    }
}
