//! Indicator engine.
//!
//! Indicators are precomputed once per series before the bar walk and then
//! queried by bar index. A value at bar t depends only on bars 0..=t.

pub mod sma;

pub use sma::Sma;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The series is shorter than the indicator (or strategy) needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("insufficient data: need {required} bars, have {available}")]
pub struct InsufficientData {
    pub required: usize,
    pub available: usize,
}

/// Precomputed indicator values aligned one-to-one with a price series.
///
/// Warmup entries are `None`; nothing downstream ever sees a placeholder number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    name: String,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value at `bar_index`, or `None` during warmup or out of bounds.
    pub fn get(&self, bar_index: usize) -> Option<f64> {
        self.values.get(bar_index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Same as `make_bars` but with `low == close`, so stops trigger on closes only.
#[cfg(test)]
pub fn make_close_only_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    make_bars(closes)
        .into_iter()
        .map(|mut b| {
            b.low = b.close;
            b
        })
        .collect()
}

#[cfg(test)]
pub fn make_series(closes: &[f64]) -> crate::domain::PriceSeries {
    crate::domain::PriceSeries::new("TEST", make_bars(closes)).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_series_get() {
        let iv = IndicatorSeries::new("sma_2", vec![None, Some(100.0), Some(101.0)]);
        assert_eq!(iv.name(), "sma_2");
        assert_eq!(iv.get(0), None);
        assert_eq!(iv.get(1), Some(100.0));
        assert_eq!(iv.get(2), Some(101.0));
        assert_eq!(iv.get(3), None); // out of bounds
        assert_eq!(iv.len(), 3);
    }

    #[test]
    fn insufficient_data_message() {
        let err = InsufficientData {
            required: 21,
            available: 5,
        };
        assert_eq!(err.to_string(), "insufficient data: need 21 bars, have 5");
    }
}
