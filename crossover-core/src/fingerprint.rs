//! Run fingerprinting: deterministic identities for configurations and data.
//!
//! - `FullHash`: exact identity of a `StrategyConfig` (every parameter).
//! - `DatasetHash`: content hash of one ticker's bar history.
//!
//! Both are BLAKE3 over an explicit little-endian byte encoding, so they are
//! stable across platforms and independent of serializer formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{CapitalBasis, EndOfData, StrategyConfig};
use crate::domain::PriceSeries;

/// Exact configuration identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FullHash(pub String);

impl FullHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }

    /// First 12 hex chars, for logs and report headers.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for FullHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content hash of a price series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes).to_hex().to_string())
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StrategyConfig {
    /// Hash of every parameter that can change a replay.
    pub fn full_hash(&self) -> FullHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.sma_window as u64).to_le_bytes());
        hasher.update(&self.stop_loss_fraction.to_le_bytes());
        hasher.update(&[self.use_stop_loss as u8]);
        hasher.update(&self.max_position_fraction.to_le_bytes());
        hasher.update(&self.risk_fraction.to_le_bytes());
        hasher.update(&self.initial_capital.to_le_bytes());
        hasher.update(&self.strong_buy_threshold.to_le_bytes());
        hasher.update(match self.capital_basis {
            CapitalBasis::Fixed => b"fixed".as_slice(),
            CapitalBasis::Compounding => b"compounding".as_slice(),
        });
        hasher.update(match self.end_of_data {
            EndOfData::ForceClose => b"force_close".as_slice(),
            EndOfData::Exclude => b"exclude".as_slice(),
        });
        FullHash(hasher.finalize().to_hex().to_string())
    }
}

/// Hash the ticker and every bar field in order.
pub fn dataset_hash(series: &PriceSeries) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.ticker().as_bytes());
    for bar in series.bars() {
        hasher.update(bar.date.to_string().as_bytes());
        for v in [bar.open, bar.high, bar.low, bar.close] {
            hasher.update(&v.to_le_bytes());
        }
        hasher.update(&bar.volume.to_le_bytes());
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}
