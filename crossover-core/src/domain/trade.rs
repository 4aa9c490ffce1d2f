//! Trade: a closed round trip, immutable once recorded.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Position;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    /// Close crossed back below the SMA.
    SmaExit,
    /// Bar traded at or below the fixed stop; filled at the stop price.
    StopLoss,
    /// History ran out while the position was open; filled at the final close.
    EndOfData,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::SmaExit => "SMA_EXIT",
            ExitReason::StopLoss => "STOP_LOSS",
            ExitReason::EndOfData => "END_OF_DATA",
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete round-trip trade record: entry → exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub ticker: String,

    // ── Entry ──
    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    // ── Exit ──
    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    pub shares: u64,

    // ── PnL ──
    pub pnl_dollars: f64,
    /// Return on entry price as a fraction (-0.05 = -5%).
    pub pnl_pct: f64,

    pub exit_reason: ExitReason,
}

impl Trade {
    /// Close `position` at `exit_price`, consuming it.
    pub fn close(
        position: Position,
        exit_bar: usize,
        exit_date: NaiveDate,
        exit_price: f64,
        exit_reason: ExitReason,
    ) -> Self {
        let diff = exit_price - position.entry_price;
        Self {
            pnl_dollars: diff * position.shares as f64,
            pnl_pct: diff / position.entry_price,
            ticker: position.ticker,
            entry_bar: position.entry_bar,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_bar,
            exit_date,
            exit_price,
            shares: position.shares,
            exit_reason,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl_dollars > 0.0
    }

    pub fn bars_held(&self) -> usize {
        self.exit_bar.saturating_sub(self.entry_bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> Position {
        Position {
            ticker: "SPY".into(),
            entry_bar: 4,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            entry_price: 100.0,
            shares: 10,
            stop_loss_price: 95.0,
            allocated_capital: 1000.0,
        }
    }

    #[test]
    fn close_computes_pnl() {
        let exit = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        let trade = Trade::close(position(), 8, exit, 110.0, ExitReason::SmaExit);
        assert_eq!(trade.pnl_dollars, 100.0);
        assert!((trade.pnl_pct - 0.10).abs() < 1e-12);
        assert_eq!(trade.bars_held(), 4);
        assert!(trade.is_winner());
    }

    #[test]
    fn stop_loss_close_is_capped() {
        let exit = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let trade = Trade::close(position(), 6, exit, 95.0, ExitReason::StopLoss);
        assert_eq!(trade.pnl_dollars, -50.0);
        assert!((trade.pnl_pct + 0.05).abs() < 1e-12);
        assert!(!trade.is_winner());
    }

    #[test]
    fn exit_reason_wire_names() {
        assert_eq!(
            serde_json::to_string(&ExitReason::EndOfData).unwrap(),
            "\"END_OF_DATA\""
        );
        assert_eq!(ExitReason::StopLoss.to_string(), "STOP_LOSS");
    }
}
