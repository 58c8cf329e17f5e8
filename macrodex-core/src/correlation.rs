//! Pearson correlation between two aligned sequences.

/// Pearson correlation coefficient in [-1, 1].
///
/// Unequal lengths, fewer than two pairs, or a zero denominator (either
/// sequence constant) all yield 0.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    covariance / denominator
}

/// Correlation of `xs[i]` with `ys[i + lag]`, i.e. `xs` leading `ys` by
/// `lag` observations.
pub fn lagged_correlation(xs: &[f64], ys: &[f64], lag: usize) -> f64 {
    if xs.len() != ys.len() || lag >= xs.len() {
        return 0.0;
    }
    let n = xs.len() - lag;
    pearson_correlation(&xs[..n], &ys[lag..])
}
