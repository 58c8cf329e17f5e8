//! Domain types: time series and per-source snapshots.

pub mod series;
pub mod snapshot;

pub use series::{DailySeries, IntradaySeries, TimeSeries, TimeSeriesPoint};
pub use snapshot::{LiquiditySnapshot, PmiSnapshot, PriceSnapshot, PMI_NEUTRAL};
