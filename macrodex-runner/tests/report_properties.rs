//! Property tests for report building on seeded synthetic data.
//!
//! Uses proptest to verify:
//! 1. Timeline order — history dates strictly increase on the step grid
//! 2. Lag rounding — the lagged coefficient uses ceil(lag_days / step_days)
//! 3. Chart coverage — every charted point is a real price observation

use chrono::NaiveDate;
use macrodex_core::history::index_price_pairs;
use macrodex_core::{lagged_correlation, FixedClock};
use macrodex_runner::{build_report, generate_synthetic, ReportOptions};
use proptest::prelude::*;

fn clock() -> FixedClock {
    FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn options(step_days: u32, lag_days: u32) -> ReportOptions {
    let mut options = ReportOptions {
        lag_days,
        ..ReportOptions::default()
    };
    options.history.step_days = step_days;
    options
}

// ── 1. Timeline Order ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn history_follows_step_grid(
        seed in any::<u64>(),
        days in 20u32..150,
        step in 1u32..20,
    ) {
        let data = generate_synthetic(seed, start(), days);
        let report = build_report(&data, &options(step, 0), &clock());

        for pair in report.history.windows(2) {
            let gap = (pair[1].timestamp - pair[0].timestamp).num_days();
            prop_assert!(gap > 0);
            prop_assert_eq!(gap % i64::from(step), 0);
        }
        for point in &report.history {
            prop_assert!((0.0..=100.0).contains(&point.index));
        }
    }
}

// ── 2. Lag Rounding ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lag_is_rounded_up_to_whole_steps(
        seed in any::<u64>(),
        step in 1u32..15,
        lag in 0u32..120,
    ) {
        let data = generate_synthetic(seed, start(), 200);
        let report = build_report(&data, &options(step, lag), &clock());
        let (index, price) = index_price_pairs(&report.history, &data.sources.price);

        let steps = lag.div_ceil(step) as usize;
        prop_assert_eq!(
            report.correlation.lagged_coefficient,
            lagged_correlation(&index, &price, steps)
        );
        prop_assert_eq!(report.correlation.lag_days, lag);
        prop_assert_eq!(report.correlation.sample_size, index.len());
    }
}

// ── 3. Chart Coverage ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn chart_points_are_price_observations(seed in any::<u64>(), step in 1u32..15) {
        let data = generate_synthetic(seed, start(), 90);
        let report = build_report(&data, &options(step, 0), &clock());

        prop_assert!(report.chart.len() <= data.price_intraday.len());
        for point in &report.chart {
            prop_assert_eq!(data.price_intraday.get(point.timestamp), Some(point.price));
            prop_assert!((0.0..=100.0).contains(&point.index));
        }
    }
}
