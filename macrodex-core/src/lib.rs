//! Macrodex Core — the direction index engine.
//!
//! This crate turns three heterogeneous series into one bounded score:
//! - Domain types (time series, liquidity/PMI/price snapshots)
//! - Sample statistics and z-scores with degenerate-input fallbacks
//! - Short versus medium window price trend
//! - Forward-fill and nearest-within-tolerance date alignment
//! - Weighted direction index composition and interpretation
//! - Pearson correlation between aligned sequences
//! - Historical index reconstruction
//!
//! Everything here is a pure, synchronous function of its inputs. Nothing
//! fails: empty, short or constant inputs map to fixed numeric fallbacks.

pub mod clock;
pub mod composer;
pub mod correlation;
pub mod data;
pub mod domain;
pub mod history;
pub mod stats;
pub mod trend;

pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::{compose_index, DirectionIndex, IndexInputs, Interpretation};
pub use correlation::{lagged_correlation, pearson_correlation};
pub use data::SourceSeries;
pub use history::{build_index_history, HistoryConfig, IndexHistoryBuilder};
pub use stats::{compute_stats, z_score, SampleStats};
pub use trend::estimate_trend;


#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: results and inputs can cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::DailySeries>();
        require_sync::<domain::DailySeries>();
        require_send::<domain::IntradaySeries>();
        require_sync::<domain::IntradaySeries>();
        require_send::<domain::LiquiditySnapshot>();
        require_sync::<domain::LiquiditySnapshot>();
        require_send::<domain::PmiSnapshot>();
        require_sync::<domain::PmiSnapshot>();
        require_send::<domain::PriceSnapshot>();
        require_sync::<domain::PriceSnapshot>();
        require_send::<SampleStats>();
        require_sync::<SampleStats>();
        require_send::<DirectionIndex>();
        require_sync::<DirectionIndex>();
        require_send::<SourceSeries>();
        require_sync::<SourceSeries>();
        require_sync::<IndexHistoryBuilder<'static>>();
        require_send::<FixedClock>();
        require_sync::<SystemClock>();
    }

    /// Architecture contract: the compositor reads the clock only through the
    /// injected `Clock`, so two calls with the same fixed clock agree exactly.
    #[test]
    fn compose_is_deterministic_under_fixed_clock() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let clock = FixedClock::at_date(date);
        let liquidity = domain::LiquiditySnapshot::new(date, 10.0, 1.0, 1.0);
        let pmi = domain::PmiSnapshot::new(date, 52.0);
        let price = domain::PriceSnapshot::new(clock.now(), 100.0);
        let inputs = IndexInputs {
            liquidity: &liquidity,
            liquidity_history: &[7.0, 8.0, 9.0],
            pmi: &pmi,
            pmi_history: &[49.0, 51.0],
            price: &price,
            recent_prices: &[98.0, 99.0, 100.0],
        };
        assert_eq!(compose_index(&inputs, &clock), compose_index(&inputs, &clock));
    }
}
