//! Direction index compositor.
//!
//! Blends three normalized inputs into one score:
//! - liquidity z-score against its own history
//! - PMI z-score, recentered at the 50 expansion/contraction threshold
//! - price trend from the trend estimator
//!
//! Z-scores are clamped to [-2, 2] and halved onto [-1, 1] before weighting,
//! the weighted sum is mapped from [-1, 1] onto [0, 100].

pub mod interpretation;

pub use interpretation::Interpretation;

use crate::clock::Clock;
use crate::domain::{LiquiditySnapshot, PmiSnapshot, PriceSnapshot, PMI_NEUTRAL};
use crate::stats::compute_stats;
use crate::trend::estimate_trend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weight of the liquidity component.
pub const LIQUIDITY_WEIGHT: f64 = 0.40;
/// Weight of the PMI component.
pub const PMI_WEIGHT: f64 = 0.35;
/// Weight of the price trend component.
pub const TREND_WEIGHT: f64 = 0.25;

/// Z-scores are clamped to +/- this many standard deviations.
pub const Z_SCORE_LIMIT: f64 = 2.0;

/// One computed direction index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionIndex {
    /// Score in [0, 100], two decimals.
    pub index: f64,
    /// Unclamped liquidity z-score.
    pub liquidity_z_score: f64,
    /// Unclamped z-score of PMI - 50.
    pub pmi_z_score: f64,
    /// Price trend in [-1, 1].
    pub btc_trend: f64,
    pub timestamp: DateTime<Utc>,
    pub interpretation: Interpretation,
}

/// Everything one index computation reads.
#[derive(Debug, Clone, Copy)]
pub struct IndexInputs<'a> {
    pub liquidity: &'a LiquiditySnapshot,
    pub liquidity_history: &'a [f64],
    pub pmi: &'a PmiSnapshot,
    pub pmi_history: &'a [f64],
    pub price: &'a PriceSnapshot,
    pub recent_prices: &'a [f64],
}

/// Compose the direction index. Never fails; degenerate histories fall back
/// to neutral statistics. The result is stamped with `clock.now()`.
pub fn compose_index(inputs: &IndexInputs<'_>, clock: &dyn Clock) -> DirectionIndex {
    let liquidity_stats = compute_stats(inputs.liquidity_history);
    let liquidity_z_score = liquidity_stats.z_score(inputs.liquidity.liquidity());

    let centered_pmi: Vec<f64> = inputs
        .pmi_history
        .iter()
        .map(|v| v - PMI_NEUTRAL)
        .collect();
    let pmi_stats = compute_stats(&centered_pmi);
    let pmi_z_score = pmi_stats.z_score(inputs.pmi.value - PMI_NEUTRAL);

    let btc_trend = estimate_trend(inputs.price.price, inputs.recent_prices);

    let raw = LIQUIDITY_WEIGHT * bounded(liquidity_z_score)
        + PMI_WEIGHT * bounded(pmi_z_score)
        + TREND_WEIGHT * btc_trend;
    let index = round2(((raw + 1.0) / 2.0 * 100.0).clamp(0.0, 100.0));

    tracing::trace!(
        liquidity_z_score,
        pmi_z_score,
        btc_trend,
        index,
        "composed direction index"
    );

    DirectionIndex {
        index,
        liquidity_z_score,
        pmi_z_score,
        btc_trend,
        timestamp: clock.now(),
        interpretation: Interpretation::from_index(index),
    }
}

/// Clamp to [-2, 2] and map onto [-1, 1]. NaN counts as 0.
fn bounded(z: f64) -> f64 {
    if z.is_nan() {
        return 0.0;
    }
    z.clamp(-Z_SCORE_LIMIT, Z_SCORE_LIMIT) / Z_SCORE_LIMIT
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
