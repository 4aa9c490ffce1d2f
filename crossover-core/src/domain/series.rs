//! PriceSeries: the validated, chronological bar history of one ticker.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::Bar;

/// Reasons a bar sequence cannot become a `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series for '{ticker}' is empty")]
    Empty { ticker: String },

    #[error("series for '{ticker}' is not chronological: {date} follows {previous}")]
    NotChronological {
        ticker: String,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("series for '{ticker}' has a duplicate bar on {date}")]
    DuplicateDate { ticker: String, date: NaiveDate },

    #[error("series for '{ticker}' has an invalid close on {date}: {close}")]
    InvalidClose {
        ticker: String,
        date: NaiveDate,
        close: f64,
    },
}

/// Ordered bar history for one ticker, strictly increasing by date.
///
/// Construction is the only validation point; every consumer downstream may
/// assume chronological, deduplicated bars with finite positive closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();
        if bars.is_empty() {
            return Err(SeriesError::Empty { ticker });
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(SeriesError::InvalidClose {
                    ticker,
                    date: bar.date,
                    close: bar.close,
                });
            }
            if i == 0 {
                continue;
            }
            let previous = bars[i - 1].date;
            if bar.date == previous {
                return Err(SeriesError::DuplicateDate {
                    ticker,
                    date: bar.date,
                });
            }
            if bar.date < previous {
                return Err(SeriesError::NotChronological {
                    ticker,
                    previous,
                    date: bar.date,
                });
            }
        }

        Ok(Self { ticker, bars })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn accepts_chronological_bars() {
        let series = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 11.0)]).unwrap();
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().close, 11.0);
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![10.0, 11.0]);
    }

    #[test]
    fn rejects_empty() {
        let err = PriceSeries::new("AAPL", vec![]).unwrap_err();
        assert!(matches!(err, SeriesError::Empty { .. }));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateDate { .. }));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let err = PriceSeries::new("AAPL", vec![bar(3, 10.0), bar(2, 11.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::NotChronological { .. }));
    }

    #[test]
    fn rejects_non_positive_close() {
        let err = PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(3, 0.0)]).unwrap_err();
        assert!(matches!(err, SeriesError::InvalidClose { .. }));
    }
}
