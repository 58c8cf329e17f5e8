//! TimeSeries — ordered observations keyed by time.
//!
//! Every source (liquidity components, PMI, price) is held as one sorted map
//! from its time key to its value. Alignment never relies on positional
//! indices, so sources of different cadence can be joined safely.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;

/// A single `(date, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint<K = NaiveDate> {
    pub date: K,
    pub value: f64,
}

impl<K> TimeSeriesPoint<K> {
    pub fn new(date: K, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observations sorted ascending by key. Duplicate keys keep the last value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<K: Ord = NaiveDate> {
    points: BTreeMap<K, f64>,
}

/// Daily, weekly or monthly observations.
pub type DailySeries = TimeSeries<NaiveDate>;

/// Intraday observations with a full UTC timestamp.
pub type IntradaySeries = TimeSeries<DateTime<Utc>>;

impl<K: Ord + Copy> Default for TimeSeries<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Copy> TimeSeries<K> {
    pub fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Insert an observation. An existing value at the same key is replaced.
    pub fn insert(&mut self, date: K, value: f64) {
        self.points.insert(date, value);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value observed exactly at `date`.
    pub fn get(&self, date: K) -> Option<f64> {
        self.points.get(&date).copied()
    }

    /// Most recent observation at or before `date` (forward-fill).
    pub fn latest_at_or_before(&self, date: K) -> Option<TimeSeriesPoint<K>> {
        self.points
            .range(..=date)
            .next_back()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    /// Most recent observation strictly before `date`.
    pub fn latest_before(&self, date: K) -> Option<TimeSeriesPoint<K>> {
        self.points
            .range(..date)
            .next_back()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    /// Earliest observation strictly after `date`.
    pub fn earliest_after(&self, date: K) -> Option<TimeSeriesPoint<K>> {
        self.points
            .range((Bound::Excluded(date), Bound::Unbounded))
            .next()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    pub fn first(&self) -> Option<TimeSeriesPoint<K>> {
        self.points
            .iter()
            .next()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    pub fn last(&self) -> Option<TimeSeriesPoint<K>> {
        self.points
            .iter()
            .next_back()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    /// Values with keys in the half-open range `(after, up_to]`, ascending.
    pub fn values_between(&self, after: K, up_to: K) -> Vec<f64> {
        if after >= up_to {
            return Vec::new();
        }
        self.points
            .range((Bound::Excluded(after), Bound::Included(up_to)))
            .map(|(_, v)| *v)
            .collect()
    }

    /// The last `count` values at or before `date`, ascending.
    pub fn trailing_values(&self, date: K, count: usize) -> Vec<f64> {
        let mut values: Vec<f64> = self
            .points
            .range(..=date)
            .rev()
            .take(count)
            .map(|(_, v)| *v)
            .collect();
        values.reverse();
        values
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = TimeSeriesPoint<K>> + '_ {
        self.points
            .iter()
            .map(|(k, v)| TimeSeriesPoint::new(*k, *v))
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = K> + '_ {
        self.points.keys().copied()
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.points.values().copied()
    }

    /// Multiply every value by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.iter().map(|(k, v)| (*k, v * factor)).collect(),
        }
    }
}

impl<K: Ord + Copy> FromIterator<TimeSeriesPoint<K>> for TimeSeries<K> {
    fn from_iter<I: IntoIterator<Item = TimeSeriesPoint<K>>>(iter: I) -> Self {
        let mut series = Self::new();
        for point in iter {
            series.insert(point.date, point.value);
        }
        series
    }
}

impl<K: Ord + Copy> FromIterator<(K, f64)> for TimeSeries<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl IntradaySeries {
    /// Collapse to one value per calendar day, keeping the last observation
    /// of each day.
    pub fn to_daily(&self) -> DailySeries {
        self.iter()
            .map(|p| (p.date.date_naive(), p.value))
            .collect()
    }
}
