//! Deterministic synthetic bars for offline runs and tests.
//!
//! Each ticker gets its own random walk seeded from a BLAKE3 hash of the
//! symbol, so the same ticker always produces the same history. Weekends
//! are skipped.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Bar, PriceSeries};

use super::provider::{finalize_series, DataSource, FeedError, PriceFeed};

#[derive(Debug, Clone)]
pub struct SyntheticFeed {
    start: NaiveDate,
    end: NaiveDate,
    start_price: f64,
    /// Half-width of the uniform daily return range.
    daily_range: f64,
    /// Small upward bias per bar so crossovers happen in both directions.
    drift: f64,
}

impl SyntheticFeed {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            start_price: 100.0,
            daily_range: 0.03,
            drift: 0.0005,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Unvalidated bars over the feed's whole date range.
    pub fn generate(&self, ticker: &str) -> Vec<Bar> {
        let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = self.start;

        while current <= self.end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += Duration::days(1);
                continue;
            }

            let daily_return: f64 = self.drift + rng.gen_range(-self.daily_range..self.daily_range);
            let open = price;
            let close = (price * (1.0 + daily_return)).max(0.01);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            bars.push(Bar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += Duration::days(1);
        }
        bars
    }
}

impl PriceFeed for SyntheticFeed {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FeedError> {
        finalize_series(ticker, self.generate(ticker), start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> SyntheticFeed {
        SyntheticFeed::new(
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
        )
    }

    #[test]
    fn same_ticker_same_bars() {
        assert_eq!(feed().generate("SPY"), feed().generate("SPY"));
    }

    #[test]
    fn different_tickers_differ() {
        assert_ne!(feed().generate("SPY"), feed().generate("QQQ"));
    }

    #[test]
    fn skips_weekends_and_passes_validation() {
        let series = feed().fetch_series("AAPL", None, None).unwrap();
        assert!(series.len() > 250);
        assert!(series
            .bars()
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(series.bars().iter().all(|b| b.is_sane()));
    }

    #[test]
    fn honours_requested_range() {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let series = feed().fetch_series("AAPL", Some(start), None).unwrap();
        assert!(series.first_date() >= start);
    }
}
