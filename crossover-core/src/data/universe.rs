//! Ticker lists: one symbol per line.
//!
//! Blank lines and `#` comments are ignored, symbols are trimmed and
//! upper-cased, and duplicates are dropped keeping the first occurrence.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("failed to read ticker list {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid ticker symbol '{symbol}'")]
    InvalidSymbol { line: usize, symbol: String },

    #[error("ticker list contains no symbols")]
    Empty,
}

/// Parse a ticker list from text.
pub fn parse_tickers(content: &str) -> Result<Vec<String>, UniverseError> {
    normalize(
        content
            .lines()
            .enumerate()
            .map(|(i, raw)| (i + 1, raw.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#')),
    )
}

/// Apply the ticker-list rules to symbols that did not come from a file.
///
/// Blank entries are invalid here; `line` in the error is the 1-based
/// position in `symbols`.
pub fn normalize_tickers<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<String>, UniverseError> {
    normalize(
        symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (i + 1, s.as_ref().trim())),
    )
}

fn normalize<'a>(
    entries: impl Iterator<Item = (usize, &'a str)>,
) -> Result<Vec<String>, UniverseError> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for (line, raw) in entries {
        let symbol = raw.to_ascii_uppercase();
        if !is_valid_symbol(&symbol) {
            return Err(UniverseError::InvalidSymbol {
                line,
                symbol: raw.to_string(),
            });
        }
        if seen.insert(symbol.clone()) {
            tickers.push(symbol);
        }
    }

    if tickers.is_empty() {
        return Err(UniverseError::Empty);
    }
    Ok(tickers)
}

/// Load a ticker list from a file.
pub fn load_tickers(path: &Path) -> Result<Vec<String>, UniverseError> {
    let content = std::fs::read_to_string(path).map_err(|source| UniverseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tickers(&content)
}

/// Letters, digits, `.` and `-` (e.g. `BRK.B`, `BF-B`); the symbol doubles
/// as a file name in the CSV feed, so nothing path-like gets through.
fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol.len() <= 12
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !symbol.starts_with('.')
}
