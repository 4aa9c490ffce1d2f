//! CSV directory feed: one `<TICKER>.csv` file per ticker.
//!
//! Columns: `date,open,high,low,close,volume` (capitalised headers such as
//! `Date,Open,...` are accepted, extra columns like `Adj Close` ignored).
//! Empty open/high/low cells are carried as NaN; `close` is required.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{Bar, PriceSeries};

use super::provider::{finalize_series, DataSource, FeedError, PriceFeed};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Open")]
    open: Option<f64>,
    #[serde(alias = "High")]
    high: Option<f64>,
    #[serde(alias = "Low")]
    low: Option<f64>,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Volume")]
    volume: Option<f64>,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open.unwrap_or(f64::NAN),
            high: row.high.unwrap_or(f64::NAN),
            low: row.low.unwrap_or(f64::NAN),
            close: row.close,
            volume: row.volume.map_or(0, |v| v.max(0.0) as u64),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvOut<'a> {
    date: &'a NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

#[derive(Debug, Clone)]
pub struct CsvDirFeed {
    dir: PathBuf,
}

impl CsvDirFeed {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }
}

impl PriceFeed for CsvDirFeed {
    fn name(&self) -> &str {
        "csv"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvDirectory
    }

    fn fetch_series(
        &self,
        ticker: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FeedError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(FeedError::NotFound {
                ticker: ticker.to_string(),
                path,
            });
        }
        let bars = read_bars(ticker, &path)?;
        finalize_series(ticker, bars, start, end)
    }
}

/// Read every row of a bar CSV file, without validation.
pub fn read_bars(ticker: &str, path: &Path) -> Result<Vec<Bar>, FeedError> {
    let malformed = |source: csv::Error| FeedError::Malformed {
        ticker: ticker.to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(malformed)?;

    let mut bars = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        bars.push(Bar::from(row.map_err(malformed)?));
    }
    Ok(bars)
}

/// Write `series` in the layout `CsvDirFeed` reads.
pub fn write_series_csv(path: &Path, series: &PriceSeries) -> Result<(), FeedError> {
    let malformed = |source: csv::Error| FeedError::Malformed {
        ticker: series.ticker().to_string(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(malformed)?;
    for bar in series.bars() {
        writer
            .serialize(CsvOut {
                date: &bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            })
            .map_err(malformed)?;
    }
    writer.flush().map_err(|source| FeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesError;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn reads_lowercase_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "AAPL.csv",
            "date,open,high,low,close,volume\n\
             2024-01-02,10,11,9,10.5,1000\n\
             2024-01-03,10.5,12,10,11.5,2000\n",
        );
        let feed = CsvDirFeed::new(dir.path());
        let series = feed.fetch_series("AAPL", None, None).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().close, 11.5);
        assert_eq!(series.last().volume, 2000);
    }

    #[test]
    fn reads_capitalised_headers_and_missing_low() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "MSFT.csv",
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,10,11,,10.5,10.4,1000.0\n",
        );
        let series = CsvDirFeed::new(dir.path())
            .fetch_series("MSFT", None, None)
            .unwrap();
        let bar = series.bars()[0];
        assert!(bar.low.is_nan());
        assert_eq!(bar.stop_probe(), 10.5);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvDirFeed::new(dir.path())
            .fetch_series("NOPE", None, None)
            .unwrap_err();
        assert!(matches!(err, FeedError::NotFound { .. }));
    }

    #[test]
    fn unparseable_row_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "BAD.csv", "date,open,high,low,close,volume\nnot-a-date,1,1,1,1,1\n");
        let err = CsvDirFeed::new(dir.path())
            .fetch_series("BAD", None, None)
            .unwrap_err();
        assert!(matches!(err, FeedError::Malformed { .. }));
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "ORD.csv",
            "date,open,high,low,close,volume\n\
             2024-01-03,10,11,9,10,1\n\
             2024-01-02,10,11,9,10,1\n",
        );
        let err = CsvDirFeed::new(dir.path())
            .fetch_series("ORD", None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            FeedError::Series(SeriesError::NotChronological { .. })
        ));
    }

    #[test]
    fn written_series_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let series = crate::indicators::make_series(&[10.0, 11.0, 12.0]);
        let feed = CsvDirFeed::new(dir.path());
        write_series_csv(&feed.path_for("TEST"), &series).unwrap();
        let back = feed.fetch_series("TEST", None, None).unwrap();
        assert_eq!(back.bars(), series.bars());
    }
}
