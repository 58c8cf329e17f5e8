//! Direction index history.
//!
//! Reconstructs the index at past dates: each date is aligned with
//! forward-fill, normalized against the trailing lookback window of each
//! source, and stamped with that date's midnight UTC instead of the wall
//! clock.

use crate::clock::{Clock, FixedClock};
use crate::composer::{compose_index, DirectionIndex, IndexInputs};
use crate::data::{align_row, forward_fill, SourceSeries};
use crate::domain::{DailySeries, PmiSnapshot};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Window sizes used when reconstructing history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Calendar days of liquidity/PMI history each point is normalized against.
    pub lookback_days: u32,
    /// Number of trailing price observations fed to the trend estimator.
    pub price_window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            price_window: 30,
        }
    }
}

/// Computes direction index points from a fixed set of source histories.
#[derive(Debug, Clone)]
pub struct IndexHistoryBuilder<'a> {
    sources: &'a SourceSeries,
    liquidity: DailySeries,
    config: HistoryConfig,
}

impl<'a> IndexHistoryBuilder<'a> {
    pub fn new(sources: &'a SourceSeries, config: HistoryConfig) -> Self {
        Self {
            sources,
            liquidity: liquidity_series(sources),
            config,
        }
    }

    /// Derived liquidity at every date any component was observed.
    pub fn liquidity(&self) -> &DailySeries {
        &self.liquidity
    }

    /// Index at `date`, stamped by `clock`. `None` when liquidity or price
    /// has no observation at or before `date`. Missing PMI defaults to 50.
    pub fn index_at(&self, date: NaiveDate, clock: &dyn Clock) -> Option<DirectionIndex> {
        let row = align_row(self.sources, date);
        let liquidity = row.liquidity?;
        let price = row.price?;
        let pmi = row.pmi.unwrap_or_else(|| PmiSnapshot::neutral(date));

        // A window reaching past the earliest representable date covers
        // the whole history.
        let window_start = date
            .checked_sub_signed(Duration::days(i64::from(self.config.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let liquidity_history = self.liquidity.values_between(window_start, date);
        let pmi_history = self.sources.pmi.values_between(window_start, date);
        let recent_prices = self
            .sources
            .price
            .trailing_values(date, self.config.price_window);

        let inputs = IndexInputs {
            liquidity: &liquidity,
            liquidity_history: &liquidity_history,
            pmi: &pmi,
            pmi_history: &pmi_history,
            price: &price,
            recent_prices: &recent_prices,
        };
        Some(compose_index(&inputs, clock))
    }

    /// Index at a historical `date`, stamped with that date.
    pub fn historical_point(&self, date: NaiveDate) -> Option<DirectionIndex> {
        self.index_at(date, &FixedClock::at_date(date))
    }

    /// One point per timeline date that has liquidity and price data, in
    /// timeline order.
    pub fn build(&self, timeline: &[NaiveDate]) -> Vec<DirectionIndex> {
        let points: Vec<DirectionIndex> = timeline
            .iter()
            .filter_map(|&date| self.historical_point(date))
            .collect();
        if points.len() < timeline.len() {
            tracing::debug!(
                skipped = timeline.len() - points.len(),
                "timeline dates without liquidity or price data"
            );
        }
        points
    }

    /// Index at the most recent date covered by every source, stamped by
    /// `clock`.
    pub fn current(&self, clock: &dyn Clock) -> Option<DirectionIndex> {
        let date = self.sources.latest_common_date()?;
        self.index_at(date, clock)
    }
}

/// Convenience wrapper around [`IndexHistoryBuilder::build`].
pub fn build_index_history(
    sources: &SourceSeries,
    timeline: &[NaiveDate],
    config: &HistoryConfig,
) -> Vec<DirectionIndex> {
    IndexHistoryBuilder::new(sources, *config).build(timeline)
}

/// Liquidity at every date on which any component was observed, once all
/// three components have a value.
pub fn liquidity_series(sources: &SourceSeries) -> DailySeries {
    let mut dates: Vec<NaiveDate> = sources
        .fed_balance_sheet
        .keys()
        .chain(sources.treasury_account.keys())
        .chain(sources.reverse_repo.keys())
        .collect();
    dates.sort_unstable();
    dates.dedup();

    dates
        .into_iter()
        .filter_map(|date| {
            let fed = forward_fill(&sources.fed_balance_sheet, date)?;
            let tga = forward_fill(&sources.treasury_account, date)?;
            let rrp = forward_fill(&sources.reverse_repo, date)?;
            Some((date, fed - tga - rrp))
        })
        .collect()
}

/// Pair each index point with the price in force on its date.
///
/// Pairs are keyed by date, so both returned vectors always have the same
/// length. Points before the first price observation are skipped.
pub fn index_price_pairs(history: &[DirectionIndex], prices: &DailySeries) -> (Vec<f64>, Vec<f64>) {
    history
        .iter()
        .filter_map(|point| {
            forward_fill(prices, point.timestamp.date_naive()).map(|price| (point.index, price))
        })
        .unzip()
}
