//! Persist a run: text report, dashboard JSON and the trade tape.
//!
//! Layout under the output directory:
//! - `reports/screening_report_{ts}.txt`
//! - `dashboard/dashboard_{ts}.json` and `dashboard/latest.json`
//! - `trades/trades_{ts}.csv`
//!
//! `{ts}` is the run's `generated_at` as `%Y%m%d_%H%M%S` (UTC).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::result::UniverseRunResult;

use super::dashboard::dashboard_snapshot;
use super::text::render_text_report;

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub report_txt: PathBuf,
    pub dashboard_json: PathBuf,
    pub latest_json: PathBuf,
    pub trades_csv: PathBuf,
}

pub fn save_artifacts(result: &UniverseRunResult, output_dir: &Path) -> Result<ArtifactPaths> {
    let ts = result.generated_at.format("%Y%m%d_%H%M%S").to_string();

    let reports_dir = create_dir(&output_dir.join("reports"))?;
    let dashboard_dir = create_dir(&output_dir.join("dashboard"))?;
    let trades_dir = create_dir(&output_dir.join("trades"))?;

    let report_txt = reports_dir.join(format!("screening_report_{ts}.txt"));
    write_file(&report_txt, render_text_report(result))?;

    let json = serde_json::to_string_pretty(&dashboard_snapshot(result))
        .context("failed to serialize dashboard snapshot")?;
    let dashboard_json = dashboard_dir.join(format!("dashboard_{ts}.json"));
    let latest_json = dashboard_dir.join("latest.json");
    write_file(&dashboard_json, &json)?;
    write_file(&latest_json, &json)?;

    let trades_csv = trades_dir.join(format!("trades_{ts}.csv"));
    write_file(&trades_csv, export_trades_csv(result)?)?;

    tracing::info!(dir = %output_dir.display(), "artifacts written");

    Ok(ArtifactPaths {
        report_txt,
        dashboard_json,
        latest_json,
        trades_csv,
    })
}

/// Every closed trade of every analyzed ticker, in symbol then entry order.
///
/// Columns: ticker, entry_date, entry_price, exit_date, exit_price, shares,
/// pnl_dollars, pnl_pct, exit_reason, bars_held
pub fn export_trades_csv(result: &UniverseRunResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "ticker",
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "shares",
        "pnl_dollars",
        "pnl_pct",
        "exit_reason",
        "bars_held",
    ])?;

    for analysis in result.analyses() {
        for t in &analysis.backtest.trades {
            wtr.write_record([
                &t.ticker,
                &t.entry_date.to_string(),
                &format!("{:.4}", t.entry_price),
                &t.exit_date.to_string(),
                &format!("{:.4}", t.exit_price),
                &t.shares.to_string(),
                &format!("{:.2}", t.pnl_dollars),
                &format!("{:.6}", t.pnl_pct),
                &t.exit_reason.to_string(),
                &t.bars_held().to_string(),
            ])?;
        }
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn create_dir(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create artifact dir: {}", dir.display()))?;
    Ok(dir.to_path_buf())
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
