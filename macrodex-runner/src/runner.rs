//! Report runner — wires together loading, index history and correlation.
//!
//! Two entry points:
//! - `run_report()`: loads the configured CSV sources, then builds. Used by CLI.
//! - `build_report()`: takes pre-loaded (or synthetic) data. Used by the demo
//!   command and tests.

use chrono::{DateTime, NaiveDate, Utc};
use macrodex_core::data::{daily_timeline, merge_for_display, ChartPoint};
use macrodex_core::domain::IntradaySeries;
use macrodex_core::history::index_price_pairs;
use macrodex_core::{
    lagged_correlation, pearson_correlation, Clock, DirectionIndex, IndexHistoryBuilder,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, HistorySettings, ReportConfig};
use crate::data_loader::{load_sources, LoadError, LoadedData};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
}

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Options that shape a report beyond the data itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub history: HistorySettings,
    /// Index-leads-price lag for the lagged correlation, in days.
    pub lag_days: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            history: HistorySettings::default(),
            lag_days: 30,
        }
    }
}

/// Correlation between the index history and the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    /// Same-date Pearson coefficient.
    pub coefficient: f64,
    /// Number of (index, price) pairs.
    pub sample_size: usize,
    pub lag_days: u32,
    /// Coefficient of the index against the price `lag_days` later.
    pub lagged_coefficient: f64,
}

/// Complete result of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub dataset_hash: String,
    #[serde(default)]
    pub synthetic: bool,
    pub current: Option<DirectionIndex>,
    pub history: Vec<DirectionIndex>,
    pub correlation: CorrelationSummary,
    /// Price points merged with the nearest index value for charting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chart: Vec<ChartPoint>,
}

/// Load the configured sources and build a report.
pub fn run_report(
    config: &ReportConfig,
    lag_days: u32,
    clock: &dyn Clock,
) -> Result<MacroReport, ReportError> {
    config.history.validate()?;
    let data = load_sources(&config.sources)?;
    let options = ReportOptions {
        history: config.history.clone(),
        lag_days,
    };
    Ok(build_report(&data, &options, clock))
}

/// Build a report from loaded data. Never fails: empty or partial data
/// yields an empty history and zero correlations.
pub fn build_report(data: &LoadedData, options: &ReportOptions, clock: &dyn Clock) -> MacroReport {
    let settings = &options.history;
    let builder = IndexHistoryBuilder::new(&data.sources, settings.history_config());

    let timeline = resolve_timeline(data, settings);
    let history: Vec<DirectionIndex> = timeline
        .par_iter()
        .map(|&date| builder.historical_point(date))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();
    tracing::info!(
        dates = timeline.len(),
        points = history.len(),
        "built index history"
    );

    let current = builder.current(clock);
    let correlation = summarize_correlation(data, &history, settings.step_days, options.lag_days);

    let index_series: IntradaySeries = history.iter().map(|p| (p.timestamp, p.index)).collect();
    let chart = merge_for_display(&data.price_intraday, &index_series);

    MacroReport {
        schema_version: SCHEMA_VERSION,
        generated_at: clock.now(),
        dataset_hash: data.dataset_hash.clone(),
        synthetic: data.synthetic,
        current,
        history,
        correlation,
        chart,
    }
}

/// Timeline bounds: configured dates, else the span every source covers.
fn resolve_timeline(data: &LoadedData, settings: &HistorySettings) -> Vec<NaiveDate> {
    let start = settings
        .start_date
        .or_else(|| data.sources.earliest_common_date());
    let end = settings.end_date.or_else(|| data.sources.latest_common_date());
    match (start, end) {
        (Some(start), Some(end)) => daily_timeline(start, end, settings.step_days),
        _ => {
            tracing::warn!("no overlapping source data, history is empty");
            Vec::new()
        }
    }
}

/// The history is evenly spaced, so a lag in days becomes a lag in
/// timeline steps (rounded up).
fn summarize_correlation(
    data: &LoadedData,
    history: &[DirectionIndex],
    step_days: u32,
    lag_days: u32,
) -> CorrelationSummary {
    let (index, price) = index_price_pairs(history, &data.sources.price);
    let lag_steps = lag_days.div_ceil(step_days.max(1)) as usize;

    CorrelationSummary {
        coefficient: pearson_correlation(&index, &price),
        sample_size: index.len(),
        lag_days,
        lagged_coefficient: lagged_correlation(&index, &price, lag_steps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::generate_synthetic;
    use chrono::Duration;
    use macrodex_core::clock::start_of_day;
    use macrodex_core::data::INDEX_FALLBACK;
    use macrodex_core::{FixedClock, SourceSeries};

    fn clock() -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn report_on_synthetic_data() {
        let data = generate_synthetic(42, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 400);
        let report = build_report(&data, &ReportOptions::default(), &clock());

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert!(report.synthetic);
        assert_eq!(report.generated_at, clock().now());
        assert!(!report.history.is_empty());
        assert!(report.current.is_some());
        assert_eq!(report.correlation.sample_size, report.history.len());
        assert!((-1.0..=1.0).contains(&report.correlation.coefficient));

        // Weekly timeline, strictly increasing timestamps.
        for pair in report.history.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_days(), 7);
        }
        // The chart only holds prices within a day of an index point.
        assert!(!report.chart.is_empty());
        assert!(report.chart.len() < data.price_intraday.len());
    }

    #[test]
    fn empty_data_gives_empty_report() {
        let data = LoadedData::from_sources(
            Default::default(),
            IntradaySeries::new(),
            0,
            false,
        );
        let report = build_report(&data, &ReportOptions::default(), &clock());
        assert!(report.history.is_empty());
        assert!(report.current.is_none());
        assert!(report.chart.is_empty());
        assert_eq!(report.correlation.coefficient, 0.0);
        assert_eq!(report.correlation.sample_size, 0);
    }

    #[test]
    fn prices_without_index_chart_at_fallback() {
        let mut sources = SourceSeries::default();
        let mut price_intraday = IntradaySeries::new();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for day in 0..5 {
            let date = start + Duration::days(day);
            let price = 60_000.0 + 100.0 * day as f64;
            sources.price.insert(date, price);
            price_intraday.insert(start_of_day(date), price);
        }
        let data = LoadedData::from_sources(sources, price_intraday, 0, false);

        let report = build_report(&data, &ReportOptions::default(), &clock());
        assert!(report.history.is_empty());
        assert_eq!(report.chart.len(), 5);
        assert!(report.chart.iter().all(|p| p.index == INDEX_FALLBACK));
    }

    #[test]
    fn oversized_lookback_does_not_panic() {
        let data = generate_synthetic(5, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 60);
        let mut options = ReportOptions::default();
        options.history.lookback_days = u32::MAX;

        let report = build_report(&data, &options, &clock());
        assert!(!report.history.is_empty());
        assert!(report.history.iter().all(|p| (0.0..=100.0).contains(&p.index)));
    }

    #[test]
    fn report_is_reproducible() {
        let data = generate_synthetic(9, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 200);
        let options = ReportOptions::default();
        assert_eq!(
            build_report(&data, &options, &clock()),
            build_report(&data, &options, &clock())
        );
    }

    #[test]
    fn lag_rounds_up_to_whole_steps() {
        let data = generate_synthetic(3, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 300);
        let report = build_report(&data, &ReportOptions::default(), &clock());
        let (index, price) = index_price_pairs(&report.history, &data.sources.price);
        let summary = summarize_correlation(&data, &report.history, 7, 10);
        assert_eq!(summary.lagged_coefficient, lagged_correlation(&index, &price, 2));
    }
}
