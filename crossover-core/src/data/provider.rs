//! Price-feed capability trait and structured error types.
//!
//! The `PriceFeed` trait abstracts over where bars come from (a directory of
//! CSV files, a deterministic synthetic generator) so the runner can swap
//! implementations and tests can supply their own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Bar, PriceSeries, SeriesError};

/// Why a feed could not produce a series for one ticker.
///
/// Always scoped to that ticker; the runner records it and moves on.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("no price data for '{ticker}' at {}", path.display())]
    NotFound { ticker: String, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed price data for '{ticker}': {source}")]
    Malformed {
        ticker: String,
        #[source]
        source: csv::Error,
    },

    #[error("bar for '{ticker}' on {date} fails OHLC sanity checks")]
    InsaneBar { ticker: String, date: NaiveDate },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvDirectory,
    Synthetic,
}

/// A source of daily bars for a single ticker.
pub trait PriceFeed: Send + Sync {
    /// Human-readable name of this feed.
    fn name(&self) -> &str;

    fn source(&self) -> DataSource;

    /// Fetch the validated daily series for `ticker`, restricted to
    /// `[start, end]` when bounds are given.
    fn fetch_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FeedError>;
}

/// Shared tail of every feed: clip to the date range, reject insane bars,
/// then hand over to `PriceSeries` for chronology checks.
pub(crate) fn finalize_series(
    ticker: &str,
    bars: Vec<Bar>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceSeries, FeedError> {
    let bars: Vec<Bar> = bars
        .into_iter()
        .filter(|b| start.map_or(true, |s| b.date >= s) && end.map_or(true, |e| b.date <= e))
        .collect();

    // bars with a missing field are kept; only fully populated nonsense is rejected
    if let Some(bad) = bars.iter().find(|b| !b.is_void() && !b.is_sane()) {
        return Err(FeedError::InsaneBar {
            ticker: ticker.to_string(),
            date: bad.date,
        });
    }

    Ok(PriceSeries::new(ticker, bars)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10,
        }
    }

    #[test]
    fn clips_to_range() {
        let bars = vec![bar(1, 10.0), bar(4, 11.0), bar(5, 12.0), bar(6, 13.0)];
        let series = finalize_series(
            "X",
            bars,
            NaiveDate::from_ymd_opt(2024, 3, 4),
            NaiveDate::from_ymd_opt(2024, 3, 5),
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn empty_range_is_series_error() {
        let err = finalize_series("X", vec![bar(1, 10.0)], NaiveDate::from_ymd_opt(2025, 1, 1), None)
            .unwrap_err();
        assert!(matches!(err, FeedError::Series(SeriesError::Empty { .. })));
    }

    #[test]
    fn rejects_insane_bar() {
        let mut b = bar(1, 10.0);
        b.high = 5.0;
        let err = finalize_series("X", vec![b], None, None).unwrap_err();
        assert!(matches!(err, FeedError::InsaneBar { .. }));
    }

    #[test]
    fn keeps_bar_with_missing_low() {
        let mut b = bar(1, 10.0);
        b.low = f64::NAN;
        let series = finalize_series("X", vec![b], None, None).unwrap();
        assert_eq!(series.len(), 1);
    }
}
