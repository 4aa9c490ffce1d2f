//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window ending at (and
//! including) the current bar. First valid value at index window-1.

use crate::domain::PriceSeries;

use super::{IndicatorSeries, InsufficientData};

/// The rolling sum is recomputed from scratch every `RESYNC_EVERY` bars,
/// whatever the window, to bound drift.
const RESYNC_EVERY: usize = 256;

#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    /// `window` must be >= 1; `StrategyConfig::validate` guarantees it.
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "SMA window must be >= 1");
        Self {
            window,
            name: format!("sma_{window}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of leading bars with no value.
    pub fn lookback(&self) -> usize {
        self.window - 1
    }

    /// Compute the SMA over the whole series.
    ///
    /// Fails if the series is shorter than the window, so no all-undefined
    /// series ever reaches the signal layer.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorSeries, InsufficientData> {
        let closes: Vec<f64> = series.closes().collect();
        let n = closes.len();
        if n < self.window {
            return Err(InsufficientData {
                required: self.window,
                available: n,
            });
        }

        let mut values = vec![None; n];
        let w = self.window as f64;

        let mut sum: f64 = closes[..self.window].iter().sum();
        values[self.window - 1] = Some(sum / w);

        for i in self.window..n {
            if (i - self.window + 1) % RESYNC_EVERY == 0 {
                sum = closes[(i + 1 - self.window)..=i].iter().sum();
            } else {
                sum += closes[i] - closes[i - self.window];
            }
            values[i] = Some(sum / w);
        }

        Ok(IndicatorSeries::new(self.name.clone(), values))
    }
}
