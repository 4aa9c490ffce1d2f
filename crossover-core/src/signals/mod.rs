//! Signal generation: price vs. SMA crossover with one bar of lookback.
//!
//! A signal is a pure function of the (previous, current) bar pair, the
//! indicator values at both bars, and whether the ticker currently holds a
//! position. It has no other memory and knows nothing about stop-losses.

pub mod sma_crossover;
pub mod snapshot;

pub use sma_crossover::{input_at, signal_at, SmaCrossover};
pub use snapshot::{PositionSuggestion, SignalSnapshot};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading signal for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Upward crossover with a large enough distance above the SMA. Cosmetic tier of `Buy`.
    StrongBuy,
    /// Upward crossover while flat.
    Buy,
    /// Downward crossover while holding.
    Sell,
    Hold,
}

impl Signal {
    /// True for both buy tiers; the simulator treats them identically.
    pub fn is_entry(&self) -> bool {
        matches!(self, Signal::StrongBuy | Signal::Buy)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "STRONG_BUY",
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a signal may look at for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalInput {
    pub close: f64,
    pub sma: Option<f64>,
    pub prev_close: f64,
    pub prev_sma: Option<f64>,
    pub holding: bool,
}

/// Direction of a close-vs-SMA crossover between two consecutive bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossover {
    Above,
    Below,
}

impl Crossover {
    /// Detect a crossover. Returns `None` when either SMA is undefined.
    ///
    /// Above: prev_close <= prev_sma && close > sma.
    /// Below: prev_close >= prev_sma && close < sma.
    pub fn detect(input: &SignalInput) -> Option<Crossover> {
        let (sma, prev_sma) = (input.sma?, input.prev_sma?);
        if input.prev_close <= prev_sma && input.close > sma {
            Some(Crossover::Above)
        } else if input.prev_close >= prev_sma && input.close < sma {
            Some(Crossover::Below)
        } else {
            None
        }
    }
}
