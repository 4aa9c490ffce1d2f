//! Single-ticker backtest simulator.
//!
//! Replays one ticker bar by bar as an explicit FLAT/LONG state machine.
//! Per bar, while LONG, the stop-loss is checked before the SMA exit and
//! wins when both fire. Entries fill at the bar close; the stop is first
//! tested on the bar after entry.

use crate::config::{CapitalBasis, EndOfData, StrategyConfig};
use crate::domain::{Bar, ExitReason, Position, Trade};
use crate::signals::Signal;
use crate::sizers::RiskBudgetSizer;

use super::state::{TickerState, Transition};

/// Everything the simulator produced once history ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    /// Closed trades in chronological order.
    pub trades: Vec<Trade>,
    /// Position left open under `EndOfData::Exclude`.
    pub open_position: Option<Position>,
    pub entry_rejections: usize,
}

#[derive(Debug, Clone)]
pub struct BacktestSimulator {
    ticker: String,
    initial_capital: f64,
    capital_basis: CapitalBasis,
    use_stop_loss: bool,
    end_of_data: EndOfData,
    sizer: RiskBudgetSizer,
    state: TickerState,
    trades: Vec<Trade>,
    realized_pnl: f64,
    entry_rejections: usize,
}

impl BacktestSimulator {
    pub fn new(ticker: impl Into<String>, config: &StrategyConfig) -> Self {
        Self {
            ticker: ticker.into(),
            initial_capital: config.initial_capital,
            capital_basis: config.capital_basis,
            use_stop_loss: config.use_stop_loss,
            end_of_data: config.end_of_data,
            sizer: RiskBudgetSizer::from_config(config),
            state: TickerState::Flat,
            trades: Vec::new(),
            realized_pnl: 0.0,
            entry_rejections: 0,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn state(&self) -> &TickerState {
        &self.state
    }

    pub fn is_long(&self) -> bool {
        self.state.is_long()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn realized_pnl(&self) -> f64 {
        self.realized_pnl
    }

    /// Capital handed to the sizer on the next entry.
    ///
    /// While FLAT all of the ticker's capital is available.
    pub fn sizing_capital(&self) -> f64 {
        match self.capital_basis {
            CapitalBasis::Fixed => self.initial_capital,
            CapitalBasis::Compounding => self.initial_capital + self.realized_pnl,
        }
    }

    /// Apply one bar. `signal` must have been evaluated with
    /// `holding = self.is_long()` going into this bar.
    pub fn step(&mut self, bar_index: usize, bar: &Bar, signal: Signal) -> Transition {
        match &self.state {
            TickerState::Flat => {
                if !signal.is_entry() {
                    return Transition::Stay;
                }
                self.enter(bar_index, bar)
            }
            TickerState::Long(position) => {
                if self.use_stop_loss && position.stop_hit(bar) {
                    let stop = position.stop_loss_price;
                    self.exit(bar_index, bar, stop, ExitReason::StopLoss)
                } else if signal == Signal::Sell {
                    self.exit(bar_index, bar, bar.close, ExitReason::SmaExit)
                } else {
                    Transition::Stay
                }
            }
        }
    }

    /// Settle the end of history and hand back the trade log.
    pub fn finish(mut self, last_index: usize, last_bar: &Bar) -> SimulationOutcome {
        let mut open_position = None;
        if self.state.is_long() {
            match self.end_of_data {
                EndOfData::ForceClose => {
                    self.exit(last_index, last_bar, last_bar.close, ExitReason::EndOfData);
                }
                EndOfData::Exclude => {
                    open_position = self.state.take_position();
                }
            }
        }
        SimulationOutcome {
            trades: self.trades,
            open_position,
            entry_rejections: self.entry_rejections,
        }
    }

    fn enter(&mut self, bar_index: usize, bar: &Bar) -> Transition {
        let price = bar.close;
        match self.sizer.size(self.sizing_capital(), price) {
            Ok(sized) => {
                tracing::debug!(
                    ticker = %self.ticker,
                    date = %bar.date,
                    price,
                    shares = sized.shares,
                    stop = sized.stop_loss_price,
                    "entry"
                );
                self.state = TickerState::Long(Position {
                    ticker: self.ticker.clone(),
                    entry_bar: bar_index,
                    entry_date: bar.date,
                    entry_price: price,
                    shares: sized.shares,
                    stop_loss_price: sized.stop_loss_price,
                    allocated_capital: sized.allocated_capital,
                });
                Transition::Entered {
                    shares: sized.shares,
                    price,
                }
            }
            Err(rejected) => {
                tracing::debug!(
                    ticker = %self.ticker,
                    date = %bar.date,
                    price,
                    %rejected,
                    "entry rejected by sizer"
                );
                self.entry_rejections += 1;
                Transition::EntryRejected(rejected)
            }
        }
    }

    fn exit(&mut self, bar_index: usize, bar: &Bar, price: f64, reason: ExitReason) -> Transition {
        let Some(position) = self.state.take_position() else {
            return Transition::Stay;
        };
        let trade = Trade::close(position, bar_index, bar.date, price, reason);
        tracing::debug!(
            ticker = %self.ticker,
            date = %bar.date,
            price,
            %reason,
            pnl = trade.pnl_dollars,
            "exit"
        );
        self.realized_pnl += trade.pnl_dollars;
        self.trades.push(trade);
        Transition::Exited { reason, price }
    }
}
