//! Run configuration: strategy parameters plus where the data comes from and
//! where output goes.
//!
//! Loaded from TOML. Every section and key is optional; omitted values fall
//! back to the defaults below.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crossover_core::config::{ConfigError, StrategyConfig};

/// Deterministic identity of a run's inputs (hex BLAKE3).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Strategy(#[from] ConfigError),

    #[error("start_date {start} is after end_date {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("threads must be >= 1 when set")]
    ZeroThreads,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunConfig {
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Worker threads for the per-ticker fan-out. `None` uses rayon's global pool.
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// One symbol per line. Ignored when `tickers` is non-empty.
    pub tickers_file: Option<PathBuf>,
    pub tickers: Vec<String>,
    /// Directory of `<TICKER>.csv` files.
    pub data_dir: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Generate deterministic bars instead of reading `data_dir`.
    pub synthetic: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            tickers_file: None,
            tickers: Vec::new(),
            data_dir: PathBuf::from("data"),
            start_date: None,
            end_date: None,
            synthetic: false,
        }
    }
}

impl DataConfig {
    /// Date range for synthetic bars; open ends fall back to 2020-01-01..2024-12-31.
    pub fn synthetic_range(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .start_date
            .or_else(|| NaiveDate::from_ymd_opt(2020, 1, 1))
            .unwrap_or_default();
        let end = self
            .end_date
            .or_else(|| NaiveDate::from_ymd_opt(2024, 12, 31))
            .unwrap_or_default();
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Write the text report, dashboard JSON and trade tape after the run.
    pub write_artifacts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            write_artifacts: true,
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, RunConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, RunConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject misconfiguration before any ticker is fetched.
    pub fn validate(&self) -> Result<(), RunConfigError> {
        self.strategy.validate()?;
        if let (Some(start), Some(end)) = (self.data.start_date, self.data.end_date) {
            if start > end {
                return Err(RunConfigError::DateRange { start, end });
            }
        }
        if self.threads == Some(0) {
            return Err(RunConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Hash of everything that can change the analysis: the strategy's
    /// full hash plus the data selection. Output settings and thread count
    /// are excluded.
    pub fn run_id(&self) -> RunId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.strategy.full_hash().0.as_bytes());

        let data = &self.data;
        for ticker in &data.tickers {
            hasher.update(ticker.as_bytes());
            hasher.update(b"\n");
        }
        if let Some(path) = &data.tickers_file {
            hasher.update(path.to_string_lossy().as_bytes());
        }
        hasher.update(data.data_dir.to_string_lossy().as_bytes());
        for date in [data.start_date, data.end_date] {
            match date {
                Some(d) => hasher.update(d.to_string().as_bytes()),
                None => hasher.update(b"-"),
            };
        }
        hasher.update(&[data.synthetic as u8]);
        hasher.finalize().to_hex().to_string()
    }
}
