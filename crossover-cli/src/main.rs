//! Crossover CLI: screen and backtest a ticker list, generate synthetic data.
//!
//! Commands:
//! - `run`: analyze every ticker (TOML config plus flag overrides) and write reports
//! - `synth`: write deterministic synthetic `<TICKER>.csv` files
//! - `tickers`: validate a ticker list and print the normalized symbols

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crossover_core::data::{load_tickers, parse_tickers, write_series_csv, PriceFeed, SyntheticFeed};
use crossover_runner::{run_from_config, save_artifacts, RunConfig, UniverseRunResult};

#[derive(Parser)]
#[command(
    name = "crossover",
    about = "SMA crossover screener and single-position backtester"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen and backtest a ticker list.
    Run {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Ticker list file (one symbol per line).
        #[arg(long)]
        tickers: Option<PathBuf>,

        /// Directory of <TICKER>.csv files.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Use deterministic synthetic bars instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Output directory for reports and dashboard JSON.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// SMA window in bars.
        #[arg(long)]
        sma_window: Option<usize>,

        /// Stop-loss distance as a fraction of entry price (e.g. 0.05).
        #[arg(long)]
        stop_loss: Option<f64>,

        /// Disable stop-loss exits.
        #[arg(long, default_value_t = false)]
        no_stop_loss: bool,

        /// Worker threads for the per-ticker fan-out.
        #[arg(long)]
        threads: Option<usize>,

        /// Skip writing report files.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Write synthetic daily bars as CSV for offline runs.
    Synth {
        /// Symbols to generate (e.g., SPY QQQ AAPL).
        symbols: Vec<String>,

        /// Ticker list file; used when no symbols are given.
        #[arg(long)]
        tickers: Option<PathBuf>,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2020-01-01")]
        start: NaiveDate,

        /// End date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-12-31")]
        end: NaiveDate,

        /// Output directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,
    },
    /// Validate a ticker list and print the normalized symbols.
    Tickers {
        /// Ticker list file.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            tickers,
            data_dir,
            synthetic,
            start,
            end,
            output_dir,
            sma_window,
            stop_loss,
            no_stop_loss,
            threads,
            no_artifacts,
        } => {
            let mut run_config = match config {
                Some(path) => RunConfig::from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => RunConfig::default(),
            };

            let data = &mut run_config.data;
            if let Some(path) = tickers {
                data.tickers_file = Some(path);
                data.tickers.clear();
            }
            if let Some(dir) = data_dir {
                data.data_dir = dir;
            }
            data.synthetic |= synthetic;
            data.start_date = start.or(data.start_date);
            data.end_date = end.or(data.end_date);

            let strategy = &mut run_config.strategy;
            if let Some(window) = sma_window {
                strategy.sma_window = window;
            }
            if let Some(fraction) = stop_loss {
                strategy.stop_loss_fraction = fraction;
            }
            if no_stop_loss {
                strategy.use_stop_loss = false;
            }

            if let Some(dir) = output_dir {
                run_config.output.dir = dir;
            }
            if no_artifacts {
                run_config.output.write_artifacts = false;
            }
            run_config.threads = threads.or(run_config.threads);

            run_cmd(&run_config)
        }
        Commands::Synth {
            symbols,
            tickers,
            start,
            end,
            out_dir,
        } => run_synth(symbols, tickers, start, end, &out_dir),
        Commands::Tickers { file } => run_tickers(&file),
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("crossover=info,crossover_core=info,crossover_runner=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_cmd(config: &RunConfig) -> Result<()> {
    let result = run_from_config(config)?;
    print_summary(&result);

    if config.output.write_artifacts {
        let paths = save_artifacts(&result, &config.output.dir)?;
        println!();
        println!("Report:         {}", paths.report_txt.display());
        println!("Dashboard JSON: {}", paths.dashboard_json.display());
        println!("Latest JSON:    {}", paths.latest_json.display());
        println!("Trades CSV:     {}", paths.trades_csv.display());
    }
    Ok(())
}

fn run_synth(
    symbols: Vec<String>,
    tickers: Option<PathBuf>,
    start: NaiveDate,
    end: NaiveDate,
    out_dir: &Path,
) -> Result<()> {
    if start > end {
        bail!("--start {start} is after --end {end}");
    }
    let symbols = match (symbols.is_empty(), tickers) {
        (false, _) => parse_tickers(&symbols.join("\n"))?,
        (true, Some(path)) => load_tickers(&path)?,
        (true, None) => bail!("give symbols or --tickers FILE"),
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let feed = SyntheticFeed::new(start, end);
    for symbol in &symbols {
        let series = feed
            .fetch_series(symbol, None, None)
            .with_context(|| format!("generating {symbol}"))?;
        let path = out_dir.join(format!("{symbol}.csv"));
        write_series_csv(&path, &series)?;
        tracing::info!(symbol = symbol.as_str(), bars = series.len(), path = %path.display(), "wrote synthetic bars");
    }
    println!("Wrote {} files to {}", symbols.len(), out_dir.display());
    Ok(())
}

fn run_tickers(file: &Path) -> Result<()> {
    let tickers = load_tickers(file)?;
    for ticker in &tickers {
        println!("{ticker}");
    }
    eprintln!("{} tickers", tickers.len());
    Ok(())
}

fn print_summary(result: &UniverseRunResult) {
    let s = &result.summary;
    println!();
    println!("=== Universe Run ===");
    println!("Run:            {}", &result.run_id[..result.run_id.len().min(12)]);
    println!("Analyzed:       {}", s.tickers_analyzed);
    println!("Skipped:        {}", result.tickers_skipped);
    for (ticker, reason) in result.skipped() {
        println!("  {ticker:<8} {reason}");
    }
    println!();
    println!("--- Backtest ---");
    println!("Trades:         {}", s.total_trades);
    match s.overall_win_rate {
        Some(rate) => println!("Win Rate:       {:.1}%", rate * 100.0),
        None => println!("Win Rate:       n/a"),
    }
    println!("Net Profit:     ${:.2}", s.net_profit);
    println!("Profit Factor:  {}", s.profit_factor);
    println!("Stop Exits:     {}", s.stop_loss_exits);
    if let Some(best) = &s.best_ticker {
        println!("Best:           {} (${:.2})", best.ticker, best.net_profit);
    }
    if let Some(worst) = &s.worst_ticker {
        println!("Worst:          {} (${:.2})", worst.ticker, worst.net_profit);
    }
}
