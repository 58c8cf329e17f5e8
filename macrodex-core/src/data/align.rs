//! Multi-source time alignment.
//!
//! Two join policies:
//! - forward-fill: the latest observation at or before the query date, used
//!   to assemble per-date liquidity/PMI/price snapshots
//! - nearest within 24 hours: used only to merge two independently
//!   timestamped series for display. Unmatched points are dropped, never
//!   defaulted, unless the companion series is empty altogether.

use super::sources::SourceSeries;
use crate::clock::start_of_day;
use crate::domain::{
    IntradaySeries, LiquiditySnapshot, PmiSnapshot, PriceSnapshot, TimeSeries, TimeSeriesPoint,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum distance for the nearest-timestamp join.
pub const NEAREST_TOLERANCE_HOURS: i64 = 24;

/// Index value used for every point when the index series is empty.
pub const INDEX_FALLBACK: f64 = 50.0;

/// Forward-fill join: value of the latest observation dated `<= target`.
pub fn forward_fill<K: Ord + Copy>(series: &TimeSeries<K>, target: K) -> Option<f64> {
    series.latest_at_or_before(target).map(|p| p.value)
}

/// Observation nearest to `timestamp` within `tolerance`.
///
/// An exact match wins. Otherwise the closer neighbour is chosen; on a tie
/// the earlier one. The tolerance bound is inclusive.
pub fn nearest_within(
    series: &IntradaySeries,
    timestamp: DateTime<Utc>,
    tolerance: Duration,
) -> Option<TimeSeriesPoint<DateTime<Utc>>> {
    if let Some(value) = series.get(timestamp) {
        return Some(TimeSeriesPoint::new(timestamp, value));
    }

    let before = series
        .latest_before(timestamp)
        .map(|p| (timestamp - p.date, p));
    let after = series
        .earliest_after(timestamp)
        .map(|p| (p.date - timestamp, p));

    let nearest = match (before, after) {
        (Some(b), Some(a)) => Some(if a.0 < b.0 { a } else { b }),
        (b, a) => b.or(a),
    };

    nearest
        .filter(|(distance, _)| *distance <= tolerance)
        .map(|(_, point)| point)
}

/// A price observation with its joined index value, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinedPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub index: Option<f64>,
}

/// A price observation paired with an index value, ready for charting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub index: f64,
}

/// Join every price observation to the nearest index observation within
/// 24 hours. Points without a match carry `index: None`.
pub fn join_nearest(prices: &IntradaySeries, index: &IntradaySeries) -> Vec<JoinedPoint> {
    let tolerance = Duration::hours(NEAREST_TOLERANCE_HOURS);
    prices
        .iter()
        .map(|p| JoinedPoint {
            timestamp: p.date,
            price: p.value,
            index: nearest_within(index, p.date, tolerance).map(|m| m.value),
        })
        .collect()
}

/// Merge prices and index values for display.
///
/// With an empty index series every price point gets [`INDEX_FALLBACK`].
/// Otherwise points without an index observation within 24 hours are
/// dropped rather than flat-lined.
pub fn merge_for_display(prices: &IntradaySeries, index: &IntradaySeries) -> Vec<ChartPoint> {
    if index.is_empty() {
        return prices
            .iter()
            .map(|p| ChartPoint {
                timestamp: p.date,
                price: p.value,
                index: INDEX_FALLBACK,
            })
            .collect();
    }

    let joined = join_nearest(prices, index);
    let total = joined.len();
    let merged: Vec<ChartPoint> = joined
        .into_iter()
        .filter_map(|j| {
            j.index.map(|index| ChartPoint {
                timestamp: j.timestamp,
                price: j.price,
                index,
            })
        })
        .collect();

    if merged.len() < total {
        tracing::debug!(
            dropped = total - merged.len(),
            "price points without an index observation within tolerance"
        );
    }
    merged
}

/// Inclusive date axis from `start` to `end` every `step_days` days.
/// A zero step is treated as one day. The axis stops at the last
/// representable date.
pub fn daily_timeline(start: NaiveDate, end: NaiveDate, step_days: u32) -> Vec<NaiveDate> {
    let step = Duration::days(i64::from(step_days.max(1)));
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        dates.push(date);
        match date.checked_add_signed(step) {
            Some(next) => date = next,
            None => break,
        }
    }
    dates
}

/// Forward-filled readings of every source at one timeline date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow {
    pub date: NaiveDate,
    /// Present only when all three liquidity components have a value.
    pub liquidity: Option<LiquiditySnapshot>,
    pub pmi: Option<PmiSnapshot>,
    pub price: Option<PriceSnapshot>,
}

/// Align all sources onto `timeline` using forward-fill semantics.
///
/// The output has one row per timeline date, in timeline order.
pub fn align_sources(sources: &SourceSeries, timeline: &[NaiveDate]) -> Vec<AlignedRow> {
    timeline
        .iter()
        .map(|&date| align_row(sources, date))
        .collect()
}

/// Forward-filled readings at a single date.
pub fn align_row(sources: &SourceSeries, date: NaiveDate) -> AlignedRow {
    AlignedRow {
        date,
        liquidity: liquidity_at(sources, date),
        pmi: pmi_at(sources, date),
        price: price_at(sources, date),
    }
}

fn liquidity_at(sources: &SourceSeries, date: NaiveDate) -> Option<LiquiditySnapshot> {
    let fed = forward_fill(&sources.fed_balance_sheet, date)?;
    let tga = forward_fill(&sources.treasury_account, date)?;
    let rrp = forward_fill(&sources.reverse_repo, date)?;
    Some(LiquiditySnapshot::new(date, fed, tga, rrp))
}

fn pmi_at(sources: &SourceSeries, date: NaiveDate) -> Option<PmiSnapshot> {
    let current = sources.pmi.latest_at_or_before(date)?;
    let prior_change = sources
        .pmi
        .latest_before(current.date)
        .map(|prev| current.value - prev.value);

    let snapshot = PmiSnapshot::new(current.date, current.value).with_prior_change(prior_change);
    Some(match &sources.pmi_note {
        Some(note) => snapshot.with_source_note(note.clone()),
        None => snapshot,
    })
}

fn price_at(sources: &SourceSeries, date: NaiveDate) -> Option<PriceSnapshot> {
    let price = forward_fill(&sources.price, date)?;
    let previous = date
        .pred_opt()
        .and_then(|prev| forward_fill(&sources.price, prev));
    Some(PriceSnapshot::new(start_of_day(date), price).with_change_from(previous))
}
