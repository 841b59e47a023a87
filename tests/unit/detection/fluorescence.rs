//! Tests for fluorescence statistics inside a fitted ellipse

#[cfg(test)]
mod tests {
    use budquant::detection::fluorescence::measure_channel;
    use budquant::geometry::ellipse::Ellipse;
    use ndarray::Array2;

    // Tests statistics over a uniform plane are exact
    // Verified by adding an outlier outside the ellipse
    #[test]
    fn test_uniform_plane() {
        let plane = Array2::from_elem((64, 64), 500.0);
        let ellipse = Ellipse::from_parameters([32.0, 32.0, 10.0, 8.0, 0.0]);

        let stats = measure_channel(plane.view(), &ellipse, 1);
        assert_eq!(stats.channel, 1);
        assert!((stats.mean - 500.0).abs() < f64::EPSILON);
        assert!(stats.sd.abs() < f64::EPSILON);
        assert!((stats.median - 500.0).abs() < f64::EPSILON);
    }

    // Tests pixels outside the ellipse do not contribute
    // Verified by enlarging the ellipse to cover the bright border
    #[test]
    fn test_mask_excludes_outside() {
        let plane = Array2::from_shape_fn((64, 64), |(row, col)| {
            let distance = (col as f64 - 32.0).hypot(row as f64 - 32.0);
            if distance <= 12.0 { 200.0 } else { 10_000.0 }
        });
        let ellipse = Ellipse::from_parameters([32.0, 32.0, 8.0, 8.0, 0.0]);

        let stats = measure_channel(plane.view(), &ellipse, 0);
        assert!((stats.mean - 200.0).abs() < f64::EPSILON);
        assert!((stats.median - 200.0).abs() < f64::EPSILON);
    }

    // Tests a two-level signal produces the expected spread
    // Verified against the population standard deviation formula
    #[test]
    fn test_two_level_signal() {
        let plane = Array2::from_shape_fn((64, 64), |(_, col)| {
            if col < 32 { 100.0 } else { 300.0 }
        });
        let ellipse = Ellipse::from_parameters([31.5, 32.0, 10.0, 10.0, 0.0]);

        let stats = measure_channel(plane.view(), &ellipse, 2);
        assert!((stats.mean - 200.0).abs() < 10.0);
        assert!((stats.sd - 100.0).abs() < 5.0);
    }
}
