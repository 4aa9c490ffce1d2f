//! Screening snapshot: the signal on the latest bar plus a sizing suggestion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::indicators::IndicatorSeries;
use crate::sizers::RiskBudgetSizer;

use super::{input_at, Crossover, Signal, SmaCrossover};

/// What a buy signal on the latest bar would translate to in shares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSuggestion {
    pub shares: u64,
    pub dollars: f64,
    /// `dollars / capital`.
    pub position_fraction: f64,
    pub risk_dollars: f64,
    pub stop_loss_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub sma: Option<f64>,
    /// `(close - sma) / sma`; `None` while the SMA is undefined.
    pub distance_from_sma: Option<f64>,
    pub crossed_above: bool,
    pub crossed_below: bool,
    pub signal: Signal,
    /// Present exactly when `signal` is BUY/STRONG_BUY.
    pub suggestion: Option<PositionSuggestion>,
}

impl SignalSnapshot {
    /// Snapshot the final bar of `series`.
    ///
    /// `holding` and `capital` are the simulator's state going into that
    /// bar, so the snapshot agrees with what the replay itself saw. A
    /// BUY/STRONG_BUY the sizer rejects is reported as HOLD.
    pub fn latest(
        series: &PriceSeries,
        sma: &IndicatorSeries,
        generator: &SmaCrossover,
        sizer: &RiskBudgetSizer,
        capital: f64,
        holding: bool,
    ) -> Self {
        let index = series.len() - 1;
        let input = input_at(series.bars(), sma, index, holding);
        let mut signal = generator.evaluate(&input);
        let crossover = Crossover::detect(&input);

        let mut suggestion = None;
        if signal.is_entry() {
            match sizer.size(capital, input.close) {
                Ok(sized) => {
                    suggestion = Some(PositionSuggestion {
                        shares: sized.shares,
                        dollars: sized.allocated_capital,
                        position_fraction: sized.allocated_capital / capital,
                        risk_dollars: sized.risk_budget,
                        stop_loss_price: sized.stop_loss_price,
                    });
                }
                // an entry the sizer cannot fill is not actionable
                Err(_) => signal = Signal::Hold,
            }
        }

        Self {
            date: series.last_date(),
            close: input.close,
            sma: input.sma,
            distance_from_sma: input.sma.map(|s| (input.close - s) / s),
            crossed_above: crossover == Some(Crossover::Above),
            crossed_below: crossover == Some(Crossover::Below),
            signal,
            suggestion,
        }
    }
}
