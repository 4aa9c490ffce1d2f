//! Close-vs-SMA crossover signal.
//!
//! Priority: undefined SMA → HOLD; flat + upward cross → BUY (or STRONG_BUY);
//! holding + downward cross → SELL; otherwise HOLD.

use crate::config::StrategyConfig;
use crate::domain::Bar;
use crate::indicators::IndicatorSeries;

use super::{Crossover, Signal, SignalInput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaCrossover {
    /// Minimum `(close - sma) / sma` on the crossover bar for STRONG_BUY.
    pub strong_buy_threshold: f64,
}

impl SmaCrossover {
    pub fn new(strong_buy_threshold: f64) -> Self {
        Self {
            strong_buy_threshold,
        }
    }

    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(config.strong_buy_threshold)
    }

    pub fn evaluate(&self, input: &SignalInput) -> Signal {
        let Some(sma) = input.sma else {
            return Signal::Hold;
        };
        match (Crossover::detect(input), input.holding) {
            (Some(Crossover::Above), false) => {
                if (input.close - sma) / sma >= self.strong_buy_threshold {
                    Signal::StrongBuy
                } else {
                    Signal::Buy
                }
            }
            (Some(Crossover::Below), true) => Signal::Sell,
            _ => Signal::Hold,
        }
    }
}

impl Default for SmaCrossover {
    fn default() -> Self {
        Self::from_config(&StrategyConfig::default())
    }
}

/// Build the signal input for `bar_index` from a bar slice and its SMA.
///
/// Bar 0 has no previous bar, so its input carries no previous SMA.
pub fn input_at(bars: &[Bar], sma: &IndicatorSeries, bar_index: usize, holding: bool) -> SignalInput {
    let bar = &bars[bar_index];
    if bar_index == 0 {
        return SignalInput {
            close: bar.close,
            sma: sma.get(0),
            prev_close: bar.close,
            prev_sma: None,
            holding,
        };
    }
    SignalInput {
        close: bar.close,
        sma: sma.get(bar_index),
        prev_close: bars[bar_index - 1].close,
        prev_sma: sma.get(bar_index - 1),
        holding,
    }
}

/// Signal for `bar_index` given the holding state going into that bar.
pub fn signal_at(
    generator: &SmaCrossover,
    bars: &[Bar],
    sma: &IndicatorSeries,
    bar_index: usize,
    holding: bool,
) -> Signal {
    generator.evaluate(&input_at(bars, sma, bar_index, holding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_series, Sma};

    fn input(prev_close: f64, prev_sma: f64, close: f64, sma: f64, holding: bool) -> SignalInput {
        SignalInput {
            close,
            sma: Some(sma),
            prev_close,
            prev_sma: Some(prev_sma),
            holding,
        }
    }

    #[test]
    fn buy_on_upward_cross_when_flat() {
        let sig = SmaCrossover::new(0.10);
        assert_eq!(sig.evaluate(&input(9.0, 9.0, 10.0, 9.5, false)), Signal::Buy);
    }

    #[test]
    fn strong_buy_above_threshold() {
        let sig = SmaCrossover::new(0.05);
        // (10 - 9.333) / 9.333 = 7.1%
        assert_eq!(
            sig.evaluate(&input(9.0, 9.0, 10.0, 28.0 / 3.0, false)),
            Signal::StrongBuy
        );
    }

    #[test]
    fn no_buy_while_holding() {
        let sig = SmaCrossover::default();
        assert_eq!(sig.evaluate(&input(9.0, 9.0, 10.0, 9.5, true)), Signal::Hold);
    }

    #[test]
    fn sell_on_downward_cross_when_holding() {
        let sig = SmaCrossover::default();
        assert_eq!(sig.evaluate(&input(12.0, 11.0, 9.5, 10.8, true)), Signal::Sell);
    }

    #[test]
    fn no_sell_while_flat() {
        let sig = SmaCrossover::default();
        assert_eq!(sig.evaluate(&input(12.0, 11.0, 9.5, 10.8, false)), Signal::Hold);
    }

    #[test]
    fn undefined_indicator_holds() {
        let sig = SmaCrossover::default();
        let mut i = input(9.0, 9.0, 10.0, 9.5, false);
        i.sma = None;
        assert_eq!(sig.evaluate(&i), Signal::Hold);
        let mut i = input(9.0, 9.0, 10.0, 9.5, false);
        i.prev_sma = None;
        assert_eq!(sig.evaluate(&i), Signal::Hold);
    }

    #[test]
    fn signal_at_walks_scenario() {
        let series = make_series(&[9.0, 9.0, 9.0, 9.0, 9.0, 10.0, 11.0, 12.0, 9.5, 8.0]);
        let sma = Sma::new(3).compute(&series).unwrap();
        let sig = SmaCrossover::new(1.0);
        let bars = series.bars();

        // warmup: SMA undefined at index 1 (and previous at 2)
        assert_eq!(signal_at(&sig, bars, &sma, 0, false), Signal::Hold);
        assert_eq!(signal_at(&sig, bars, &sma, 2, false), Signal::Hold);
        // index 5: prev close 9 <= prev sma 9, close 10 > 9.33
        assert_eq!(signal_at(&sig, bars, &sma, 5, false), Signal::Buy);
        // index 8: prev close 12 >= 11, close 9.5 < 10.83
        assert_eq!(signal_at(&sig, bars, &sma, 8, true), Signal::Sell);
    }
}
