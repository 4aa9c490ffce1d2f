//! Per-ticker position state machine.

use serde::{Deserialize, Serialize};

use crate::domain::{ExitReason, Position};
use crate::sizers::SizingRejected;

/// A ticker is in exactly one of two states at any bar.
///
/// The LONG variant owns the open `Position`, so "LONG without a position"
/// and "two positions at once" are unrepresentable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "position", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TickerState {
    #[default]
    Flat,
    Long(Position),
}

impl TickerState {
    pub fn is_long(&self) -> bool {
        matches!(self, TickerState::Long(_))
    }

    pub fn position(&self) -> Option<&Position> {
        match self {
            TickerState::Long(p) => Some(p),
            TickerState::Flat => None,
        }
    }

    /// Move out of LONG, leaving FLAT behind.
    pub(crate) fn take_position(&mut self) -> Option<Position> {
        match std::mem::take(self) {
            TickerState::Long(p) => Some(p),
            TickerState::Flat => None,
        }
    }
}

/// What one bar did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// No state change (FLAT+SELL/HOLD or LONG+HOLD/BUY).
    Stay,
    /// FLAT → LONG at the bar close.
    Entered { shares: u64, price: f64 },
    /// Entry signal sized to zero shares; stays FLAT.
    EntryRejected(SizingRejected),
    /// LONG → FLAT.
    Exited { reason: ExitReason, price: f64 },
}
