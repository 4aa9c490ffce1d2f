//! Fixed-fractional risk sizer with a per-position allocation cap.
//!
//! stop        = P * (1 - S)
//! risk budget = R * C,    shares_from_risk = floor(R*C / (P*S))
//! max alloc   = M * C,    shares_from_cap  = floor(M*C / P)
//! shares      = min(shares_from_risk, shares_from_cap), rejected if 0

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StrategyConfig;

/// Why an entry could not be sized. Downgrades the signal to HOLD; not a run error.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SizingRejected {
    #[error("no capital available ({0})")]
    NoCapital(f64),

    #[error("entry price must be positive and finite (got {0})")]
    InvalidPrice(f64),

    #[error("cannot afford one share (risk allows {shares_from_risk}, cap allows {shares_from_cap})")]
    ZeroShares {
        shares_from_risk: u64,
        shares_from_cap: u64,
    },
}

/// An accepted sizing decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizedPosition {
    pub shares: u64,
    pub stop_loss_price: f64,
    /// `shares * entry_price`; never above `max_allocation`.
    pub allocated_capital: f64,
    pub risk_budget: f64,
    pub max_allocation: f64,
}

impl SizedPosition {
    /// Dollar loss if the stop fills exactly at `stop_loss_price`.
    pub fn loss_at_stop(&self, entry_price: f64) -> f64 {
        self.shares as f64 * (entry_price - self.stop_loss_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBudgetSizer {
    stop_loss_fraction: f64,
    risk_fraction: f64,
    max_position_fraction: f64,
}

impl RiskBudgetSizer {
    pub fn new(stop_loss_fraction: f64, risk_fraction: f64, max_position_fraction: f64) -> Self {
        Self {
            stop_loss_fraction,
            risk_fraction,
            max_position_fraction,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            config.stop_loss_fraction,
            config.risk_fraction,
            config.max_position_fraction,
        )
    }

    pub fn stop_loss_price(&self, entry_price: f64) -> f64 {
        entry_price * (1.0 - self.stop_loss_fraction)
    }

    /// Size an entry at `entry_price` against `capital`.
    pub fn size(&self, capital: f64, entry_price: f64) -> Result<SizedPosition, SizingRejected> {
        if !capital.is_finite() || capital <= 0.0 {
            return Err(SizingRejected::NoCapital(capital));
        }
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(SizingRejected::InvalidPrice(entry_price));
        }

        let stop_loss_price = self.stop_loss_price(entry_price);
        let risk_budget = self.risk_fraction * capital;
        let per_share_risk = entry_price * self.stop_loss_fraction;
        let shares_from_risk = (risk_budget / per_share_risk).floor() as u64;

        let max_allocation = self.max_position_fraction * capital;
        let shares_from_cap = (max_allocation / entry_price).floor() as u64;

        let shares = shares_from_risk.min(shares_from_cap);
        if shares == 0 {
            return Err(SizingRejected::ZeroShares {
                shares_from_risk,
                shares_from_cap,
            });
        }

        Ok(SizedPosition {
            shares,
            stop_loss_price,
            allocated_capital: shares as f64 * entry_price,
            risk_budget,
            max_allocation,
        })
    }
}
