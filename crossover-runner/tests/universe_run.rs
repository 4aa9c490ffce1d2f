//! Universe runs end to end: skips, aggregation, determinism across thread
//! counts, and CSV-directory input.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use crossover_core::data::{
    write_series_csv, DataSource, FeedError, PriceFeed, SyntheticFeed,
};
use crossover_core::domain::{Bar, PriceSeries};
use crossover_core::engine::ProfitFactor;
use crossover_runner::{
    run_from_config, run_universe, RunConfig, SkipReason, TickerOutcome,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// In-memory feed: close-only bars keyed by ticker.
struct MemoryFeed {
    closes: HashMap<String, Vec<f64>>,
}

impl MemoryFeed {
    fn new(entries: &[(&str, &[f64])]) -> Self {
        Self {
            closes: entries
                .iter()
                .map(|(t, c)| (t.to_string(), c.to_vec()))
                .collect(),
        }
    }
}

impl PriceFeed for MemoryFeed {
    fn name(&self) -> &str {
        "memory"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch_series(
        &self,
        ticker: &str,
        _start: Option<NaiveDate>,
        _end: Option<NaiveDate>,
    ) -> Result<PriceSeries, FeedError> {
        let closes = self.closes.get(ticker).ok_or_else(|| FeedError::NotFound {
            ticker: ticker.to_string(),
            path: PathBuf::from("memory"),
        })?;
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();
        Ok(PriceSeries::new(ticker, bars)?)
    }
}

const WINNER: [f64; 7] = [9.0, 9.0, 9.0, 9.0, 10.0, 11.0, 12.0];
const LOSER: [f64; 10] = [9.0, 9.0, 9.0, 9.0, 9.0, 10.0, 11.0, 12.0, 9.5, 8.0];

fn window_three() -> RunConfig {
    let mut config = RunConfig::default();
    config.strategy.sma_window = 3;
    config
}

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn mixed_feed() -> MemoryFeed {
    MemoryFeed::new(&[
        ("WIN", &WINNER[..]),
        ("LOSE", &LOSER[..]),
        ("SHORT", &[1.0, 2.0][..]),
    ])
}

// ── Skips and aggregation ────────────────────────────────────────────

#[test]
fn skipped_tickers_are_reported_not_aggregated() {
    let result = run_universe(
        &tickers(&["WIN", "LOSE", "SHORT", "MISSING"]),
        &mixed_feed(),
        &window_three(),
    )
    .unwrap();

    assert_eq!(result.outcomes.len(), 4);
    assert_eq!(result.tickers_skipped, 2);
    assert_eq!(result.summary.tickers_analyzed, 2);

    assert_eq!(
        result.outcomes["SHORT"],
        TickerOutcome::Skipped(SkipReason::InsufficientData {
            required: 4,
            available: 2
        })
    );
    assert!(matches!(
        result.outcomes["MISSING"],
        TickerOutcome::Skipped(SkipReason::FetchFailed { .. })
    ));
    assert_eq!(result.skipped().count(), 2);
}

#[test]
fn portfolio_summary_folds_analyzed_tickers() {
    let result = run_universe(&tickers(&["WIN", "LOSE"]), &mixed_feed(), &window_three()).unwrap();
    let s = &result.summary;

    assert_eq!(s.total_trades, 2);
    assert_eq!(s.winning_trades, 1);
    assert_eq!(s.losing_trades, 1);
    assert!((s.net_profit - 150.0).abs() < 1e-6);
    assert!((s.gross_profit - 200.0).abs() < 1e-6);
    assert!((s.gross_loss - 50.0).abs() < 1e-6);
    match s.profit_factor {
        ProfitFactor::Ratio(pf) => assert!((pf - 4.0).abs() < 1e-9),
        other => panic!("expected a finite profit factor, got {other:?}"),
    }
    assert_eq!(s.best_ticker.as_ref().unwrap().ticker, "WIN");
    assert_eq!(s.worst_ticker.as_ref().unwrap().ticker, "LOSE");
    assert_eq!(s.stop_loss_exits, 1);
    assert_eq!(s.end_of_data_exits, 1);
    assert!(s.is_profitable());
}

#[test]
fn all_skipped_gives_empty_summary() {
    let result = run_universe(&tickers(&["SHORT", "MISSING"]), &mixed_feed(), &window_three()).unwrap();
    assert_eq!(result.summary.tickers_analyzed, 0);
    assert_eq!(result.summary.total_trades, 0);
    assert_eq!(result.summary.overall_win_rate, None);
    assert!(result.summary.best_ticker.is_none());
    assert_eq!(result.tickers_skipped, 2);
}

#[test]
fn result_records_fingerprints() {
    let config = window_three();
    let result = run_universe(&tickers(&["WIN"]), &mixed_feed(), &config).unwrap();
    assert_eq!(result.run_id, config.run_id());
    assert_eq!(result.strategy_hash, config.strategy.full_hash());
    let analysis = result.outcomes["WIN"].analysis().unwrap();
    assert_eq!(analysis.backtest.dataset_hash.0.len(), 64);
}

// ── Determinism ──────────────────────────────────────────────────────

#[test]
fn thread_count_does_not_change_results() {
    let feed = SyntheticFeed::new(
        NaiveDate::from_ymd_opt(2021, 1, 4).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 29).unwrap(),
    );
    let list = tickers(&["AAPL", "MSFT", "NVDA", "AMZN", "GOOG", "META", "TSLA", "AVGO"]);

    let mut config = RunConfig::default();
    config.threads = Some(1);
    let single = run_universe(&list, &feed, &config).unwrap();

    config.threads = Some(4);
    let pooled = run_universe(&list, &feed, &config).unwrap();

    config.threads = None;
    let global = run_universe(&list, &feed, &config).unwrap();

    assert_eq!(single.outcomes, pooled.outcomes);
    assert_eq!(single.outcomes, global.outcomes);
    assert_eq!(single.summary, pooled.summary);
    assert_eq!(single.summary, global.summary);
}

// ── CSV directory input ──────────────────────────────────────────────

#[test]
fn run_from_config_reads_csv_directory() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir).unwrap();

    let synthetic = SyntheticFeed::new(
        NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
        NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
    );
    for ticker in ["SPY", "QQQ"] {
        let series = synthetic.fetch_series(ticker, None, None).unwrap();
        write_series_csv(&data_dir.join(format!("{ticker}.csv")), &series).unwrap();
    }

    let tickers_file = dir.path().join("tickers.txt");
    std::fs::write(&tickers_file, "# index funds\nspy\nqqq\n\nDIA\n").unwrap();

    let toml = format!(
        "[data]\ntickers_file = {:?}\ndata_dir = {:?}\n\n[output]\nwrite_artifacts = false\n",
        tickers_file.display().to_string(),
        data_dir.display().to_string(),
    );
    let config = RunConfig::from_toml(&toml).unwrap();
    let result = run_from_config(&config).unwrap();

    assert_eq!(result.source, DataSource::CsvDirectory);
    assert_eq!(result.outcomes.len(), 3);
    assert_eq!(result.summary.tickers_analyzed, 2);
    assert!(matches!(
        result.outcomes["DIA"],
        TickerOutcome::Skipped(SkipReason::FetchFailed { .. })
    ));

    // the CSV round trip is lossless, so the synthetic feed gives the same backtest
    let direct = run_universe(&tickers(&["SPY"]), &synthetic, &config).unwrap();
    assert_eq!(
        result.outcomes["SPY"].analysis().unwrap().backtest,
        direct.outcomes["SPY"].analysis().unwrap().backtest
    );
}
