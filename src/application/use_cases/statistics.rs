//! Numeric kernels shared by the analytics use cases.

use crate::domain::error::{AppError, Result};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile of already sorted data, `p` in `0..=100`.
///
/// The rank is `p / 100 * (n - 1)`; fractional ranks interpolate linearly
/// between the neighbouring order statistics.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return Some(sorted[lower]);
    }

    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Pearson product-moment correlation coefficient.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(AppError::Computation(
            "x and y must have the same length.".to_string(),
        ));
    }
    if x.len() < 2 {
        return Err(AppError::Computation(
            "x and y must have length at least 2.".to_string(),
        ));
    }

    // Compare against the first element; a computed mean of equal floats can
    // miss the value by an ulp and leave a tiny non-zero variance.
    if is_constant(x) || is_constant(y) {
        return Err(constant_input());
    }

    let mean_x = mean(x).unwrap_or_default();
    let mean_y = mean(y).unwrap_or_default();

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Err(constant_input());
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return Err(AppError::Computation(
            "Correlation is not finite for the given input.".to_string(),
        ));
    }

    Ok(r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

fn constant_input() -> AppError {
    AppError::Computation(
        "An input array is constant; the correlation coefficient is not defined.".to_string(),
    )
}
