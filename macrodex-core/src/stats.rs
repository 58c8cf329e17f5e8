//! Sample statistics and z-score normalization.
//!
//! `SampleStats::std_dev` is never zero: empty and constant samples fall back
//! to 1.0 so every downstream division is defined.

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleStats {
    /// Returned for an empty sample. Not a computed statistic.
    pub const EMPTY: SampleStats = SampleStats {
        mean: 0.0,
        std_dev: 1.0,
    };

    /// Z-score of `value` against this sample.
    pub fn z_score(&self, value: f64) -> f64 {
        z_score(value, self.mean, self.std_dev)
    }
}

/// Mean and population standard deviation (divide by N).
pub fn compute_stats(samples: &[f64]) -> SampleStats {
    if samples.is_empty() {
        tracing::debug!("empty sample, using fallback stats");
        return SampleStats::EMPTY;
    }

    // A constant sample is reported exactly; summation rounding would
    // otherwise leave a spurious non-zero spread.
    let first = samples[0];
    if samples.iter().all(|v| *v == first) {
        tracing::debug!(mean = first, "zero-variance sample, substituting std_dev = 1");
        return SampleStats {
            mean: first,
            std_dev: 1.0,
        };
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let mut std_dev = variance.sqrt();

    if std_dev == 0.0 {
        std_dev = 1.0;
    }

    SampleStats { mean, std_dev }
}

/// `(value - mean) / std_dev`, or 0 when `std_dev` is zero.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return 0.0;
    }
    (value - mean) / std_dev
}

/// Mean of the last `window` values (all of them if shorter).
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    if tail.is_empty() {
        return None;
    }
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}
