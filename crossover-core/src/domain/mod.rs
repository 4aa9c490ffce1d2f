//! Domain types: bars, price series, positions, trades.

pub mod bar;
pub mod position;
pub mod series;
pub mod trade;

pub use bar::Bar;
pub use position::Position;
pub use series::{PriceSeries, SeriesError};
pub use trade::{ExitReason, Trade};
