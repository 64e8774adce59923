//! Statistical helpers shared by the correlation and regression engines

/// Rank values 1-based, ties sharing the lowest rank of their run.
///
/// `[5, 5, 1]` ranks as `[2, 2, 1]`, not the textbook average `[2.5, 2.5, 1]`.
pub fn min_ranks(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    values
        .iter()
        .map(|v| (sorted.partition_point(|s| s < v) + 1) as f64)
        .collect()
}

/// Pearson correlation coefficient.
///
/// Returns 0 for fewer than two points, mismatched lengths, or when either
/// series has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if var_x == 0.0 || var_y == 0.0 || denominator < f64::EPSILON {
        return 0.0;
    }

    (covariance / denominator).clamp(-1.0, 1.0)
}

/// Spearman rank correlation: Pearson over [`min_ranks`]
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    pearson(&min_ranks(x), &min_ranks(y))
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
