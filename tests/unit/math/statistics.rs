//! Tests for descriptive statistics over intensity samples

#[cfg(test)]
mod tests {
    use budquant::math::statistics::{mean, median, mode, standard_deviation};

    // Tests mean over a small sample
    // Verified by shifting one sample
    #[test]
    fn test_mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < f64::EPSILON);
        assert!((mean(&[7.0]) - 7.0).abs() < f64::EPSILON);
    }

    // Tests the population convention divides by n, not n - 1
    // Verified by comparing against the sample formula
    #[test]
    fn test_standard_deviation_is_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((standard_deviation(&values) - 2.0).abs() < 1e-12);
        assert!(standard_deviation(&[3.0, 3.0, 3.0]).abs() < f64::EPSILON);
    }

    // Tests median for odd and even sample counts
    // Verified by swapping the two middle values
    #[test]
    fn test_median_odd_and_even() {
        assert!((median(&[5.0, 1.0, 3.0]) - 3.0).abs() < f64::EPSILON);
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < f64::EPSILON);
    }

    // Tests mode groups samples by rounded intensity level
    // Verified by spreading one level across fractional values
    #[test]
    fn test_mode_rounds_to_levels() {
        let values = [99.6, 100.2, 100.4, 50.0, 50.0, 12.0];
        assert!((mode(&values) - 100.0).abs() < f64::EPSILON);
    }

    // Tests mode ties resolve to the smallest level
    // Verified by reversing the tie-break comparison
    #[test]
    fn test_mode_tie_breaks_low() {
        let values = [10.0, 10.0, 20.0, 20.0];
        assert!((mode(&values) - 10.0).abs() < f64::EPSILON);
    }

    // Tests empty input returns NaN everywhere
    // Verified by returning zero instead
    #[test]
    fn test_empty_input_is_nan() {
        assert!(mean(&[]).is_nan());
        assert!(standard_deviation(&[]).is_nan());
        assert!(median(&[]).is_nan());
        assert!(mode(&[]).is_nan());
    }
}
