//! Descriptive statistics over pixel intensity samples
//!
//! These routines operate on raw f64 samples and follow the conventions the
//! measurement pipeline depends on: population standard deviation, median as
//! the average of the two middle values, and mode over rounded intensities.

/// Arithmetic mean of the samples
///
/// Returns NaN for empty input so that downstream comparisons fail closed.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of the samples
///
/// Returns NaN for empty input.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median of the samples; the average of the two middle values for even counts
///
/// Returns NaN for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let upper = sorted.get(n / 2).copied().unwrap_or(f64::NAN);
    if n % 2 == 1 {
        upper
    } else {
        let lower = sorted.get(n / 2 - 1).copied().unwrap_or(f64::NAN);
        f64::midpoint(lower, upper)
    }
}

/// Mode of the samples after rounding to the nearest integer
///
/// Camera intensities are integer-valued, so rounding groups samples into
/// their original quantization levels. Ties resolve to the smallest value.
/// Returns NaN for empty input.
pub fn mode(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut counts: std::collections::HashMap<i64, usize> = std::collections::HashMap::new();
    for value in values {
        let level = value.round() as i64;
        *counts.entry(level).or_insert(0) += 1;
    }

    let mut best_level = 0_i64;
    let mut best_count = 0_usize;
    for (&level, &count) in &counts {
        if count > best_count || (count == best_count && level < best_level) {
            best_level = level;
            best_count = count;
        }
    }

    best_level as f64
}
