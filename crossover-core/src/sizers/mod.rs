//! Position sizers: determine trade quantity.
//!
//! Sizers translate a capital figure and a risk budget into a whole-share
//! quantity and a fixed stop-loss price. They are signal-agnostic: a
//! STRONG_BUY is sized exactly like a BUY.

pub mod risk_budget;

pub use risk_budget::{RiskBudgetSizer, SizedPosition, SizingRejected};
