use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Bar;

/// An open long position.
///
/// Exists only while its ticker is LONG. The stop-loss price is fixed at
/// entry and never adjusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub shares: u64,
    pub stop_loss_price: f64,
    pub allocated_capital: f64,
}

impl Position {
    pub fn market_value(&self, current_price: f64) -> f64 {
        self.shares as f64 * current_price
    }

    pub fn unrealized_pnl(&self, current_price: f64) -> f64 {
        self.shares as f64 * (current_price - self.entry_price)
    }

    /// True when the bar trades at or through the stop.
    pub fn stop_hit(&self, bar: &Bar) -> bool {
        bar.stop_probe() <= self.stop_loss_price
    }
}
