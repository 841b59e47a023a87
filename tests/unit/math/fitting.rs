//! Tests for linear solving and Levenberg-Marquardt minimization

#[cfg(test)]
mod tests {
    use budquant::math::fitting::{levenberg_marquardt, solve_linear};

    // Tests Gaussian elimination against a known 3x3 system
    // Verified by altering the right-hand side
    #[test]
    fn test_solve_linear_known_system() {
        let a = vec![
            vec![2.0, 1.0, -1.0],
            vec![-3.0, -1.0, 2.0],
            vec![-2.0, 1.0, 2.0],
        ];
        let b = vec![8.0, -11.0, -3.0];

        let x = solve_linear(a, b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-10);
        assert!((x[1] - 3.0).abs() < 1e-10);
        assert!((x[2] - -1.0).abs() < 1e-10);
    }

    // Tests a system requiring a pivot swap still solves
    // Verified by disabling partial pivoting
    #[test]
    fn test_solve_linear_needs_pivoting() {
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let b = vec![3.0, 5.0];

        let x = solve_linear(a, b).unwrap();
        assert!((x[0] - 5.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    // Tests singular and malformed systems are rejected
    // Verified by returning zeros instead
    #[test]
    fn test_solve_linear_errors() {
        let singular = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(solve_linear(singular, vec![1.0, 2.0]).is_err());

        let ragged = vec![vec![1.0], vec![2.0, 3.0]];
        assert!(solve_linear(ragged, vec![1.0, 2.0]).is_err());
    }

    // Tests the minimizer recovers line coefficients from noiseless samples
    // Verified by starting further from the optimum
    #[test]
    fn test_levenberg_marquardt_line_fit() {
        let xs: Vec<f64> = (0..20).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();

        let residuals = |params: &[f64]| -> Vec<f64> {
            xs.iter()
                .zip(ys.iter())
                .map(|(&x, &y)| params[0] * x + params[1] - y)
                .collect()
        };

        let solution = levenberg_marquardt(residuals, &[0.0, 0.0], 100, 1e-12).unwrap();
        assert!((solution[0] - 2.0).abs() < 1e-6);
        assert!((solution[1] - 1.0).abs() < 1e-6);
    }

    // Tests a nonlinear exponential decay model converges
    // Verified by reducing the iteration budget to one
    #[test]
    fn test_levenberg_marquardt_exponential_fit() {
        let xs: Vec<f64> = (0..30).map(|i| f64::from(i) * 0.1).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * (-0.7 * x).exp()).collect();

        let residuals = |params: &[f64]| -> Vec<f64> {
            xs.iter()
                .zip(ys.iter())
                .map(|(&x, &y)| params[0] * (params[1] * x).exp() - y)
                .collect()
        };

        let solution = levenberg_marquardt(residuals, &[1.0, 0.0], 200, 1e-14).unwrap();
        assert!((solution[0] - 3.0).abs() < 1e-4);
        assert!((solution[1] - -0.7).abs() < 1e-4);
    }

    // Tests an empty residual vector is rejected
    // Verified by defaulting to the initial parameters
    #[test]
    fn test_levenberg_marquardt_empty_residuals() {
        let residuals = |_: &[f64]| -> Vec<f64> { Vec::new() };
        assert!(levenberg_marquardt(residuals, &[1.0], 10, 1e-9).is_err());
    }
}
