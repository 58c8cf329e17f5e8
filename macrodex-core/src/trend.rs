//! Price trend — short-window versus medium-window momentum.
//!
//! trend = (mean(last 7) - mean(last 30)) / mean(last 30), scaled by 10
//! and clamped to [-1, 1].

use crate::stats::trailing_mean;

/// Short momentum window, in observations.
pub const SHORT_WINDOW: usize = 7;

/// Medium momentum window, in observations.
pub const MEDIUM_WINDOW: usize = 30;

/// Multiplier applied to the relative spread before clamping.
pub const TREND_SCALE: f64 = 10.0;

/// Momentum signal in [-1, 1] from a chronological price history.
///
/// `_current_price` is accepted for call-site symmetry with the other inputs
/// and does not enter the computation; only `price_history` is read.
pub fn estimate_trend(_current_price: f64, price_history: &[f64]) -> f64 {
    if price_history.len() < 2 {
        return 0.0;
    }

    let (Some(short), Some(medium)) = (
        trailing_mean(price_history, SHORT_WINDOW),
        trailing_mean(price_history, MEDIUM_WINDOW),
    ) else {
        return 0.0;
    };

    if medium == 0.0 {
        tracing::debug!("medium-window mean is zero, trend = 0");
        return 0.0;
    }

    let trend = (short - medium) / medium * TREND_SCALE;
    if trend.is_nan() {
        return 0.0;
    }
    trend.clamp(-1.0, 1.0)
}
