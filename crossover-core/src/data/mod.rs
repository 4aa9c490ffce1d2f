//! Price feeds and ticker lists.
//!
//! Everything here stays on the edge of the core: feeds turn files or a
//! seeded generator into validated `PriceSeries`, and nothing downstream
//! knows where the bars came from.

pub mod csv_feed;
pub mod provider;
pub mod synthetic;
pub mod universe;

pub use csv_feed::{write_series_csv, CsvDirFeed};
pub use provider::{DataSource, FeedError, PriceFeed};
pub use synthetic::SyntheticFeed;
pub use universe::{load_tickers, normalize_tickers, parse_tickers, UniverseError};
