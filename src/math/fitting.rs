//! Nonlinear least-squares minimization for geometric curve fitting
//!
//! Implements a dense Levenberg-Marquardt loop over a residual closure with
//! forward-difference Jacobians. The parameter counts involved are tiny (five
//! for an ellipse), so normal equations with Gaussian elimination are adequate.

use std::error::Error;
use std::fmt;

/// Error type for fitting operations
#[derive(Debug, Clone)]
pub struct FittingError {
    message: String,
}

impl fmt::Display for FittingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fitting error: {}", self.message)
    }
}

impl Error for FittingError {}

impl FittingError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Solve the linear system a * x = b by Gaussian elimination with partial pivoting
///
/// The matrix is given in row-major order and consumed in place.
///
/// # Errors
///
/// Returns an error if the system is singular or dimensions are inconsistent.
pub fn solve_linear(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, FittingError> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(FittingError::new("matrix and vector dimensions disagree"));
    }

    for col in 0..n {
        // Partial pivoting keeps the elimination numerically stable
        let mut pivot_row = col;
        let mut pivot_mag = 0.0;
        for row in col..n {
            let mag = a
                .get(row)
                .and_then(|r| r.get(col))
                .copied()
                .unwrap_or(0.0)
                .abs();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = row;
            }
        }
        if pivot_mag < 1e-300 {
            return Err(FittingError::new("singular system"));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a
            .get(col)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN);
        let pivot_row_values: Vec<f64> = a.get(col).cloned().unwrap_or_default();
        let b_pivot = b.get(col).copied().unwrap_or(0.0);

        for row in col + 1..n {
            let factor = a
                .get(row)
                .and_then(|r| r.get(col))
                .copied()
                .unwrap_or(0.0)
                / pivot;
            if let Some(target) = a.get_mut(row) {
                for (j, value) in target.iter_mut().enumerate().skip(col) {
                    *value -= factor * pivot_row_values.get(j).copied().unwrap_or(0.0);
                }
            }
            if let Some(b_row) = b.get_mut(row) {
                *b_row -= factor * b_pivot;
            }
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b.get(row).copied().unwrap_or(0.0);
        for col in row + 1..n {
            sum -= a.get(row).and_then(|r| r.get(col)).copied().unwrap_or(0.0)
                * x.get(col).copied().unwrap_or(0.0);
        }
        let diagonal = a
            .get(row)
            .and_then(|r| r.get(row))
            .copied()
            .unwrap_or(f64::NAN);
        if let Some(x_row) = x.get_mut(row) {
            *x_row = sum / diagonal;
        }
    }

    Ok(x)
}

/// Minimize the sum of squared residuals with the Levenberg-Marquardt method
///
/// The residual closure maps a parameter vector to a residual vector; the
/// Jacobian is approximated by forward differences. Iteration stops when the
/// relative cost improvement or the step norm falls below `tolerance`.
///
/// # Errors
///
/// Returns an error if the residual closure produces no residuals, if the
/// damped normal equations stay singular, or if no progress is possible.
pub fn levenberg_marquardt<F>(
    residuals: F,
    initial: &[f64],
    max_iterations: usize,
    tolerance: f64,
) -> Result<Vec<f64>, FittingError>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let mut params: Vec<f64> = initial.to_vec();
    let n_params = params.len();
    let mut current = residuals(&params);
    if current.is_empty() {
        return Err(FittingError::new("no residuals to minimize"));
    }
    let mut cost = sum_of_squares(&current);
    let mut lambda = 1e-3;

    for _ in 0..max_iterations {
        let jacobian = numeric_jacobian(&residuals, &params, &current);

        // Normal equations: (J^T J + lambda * diag(J^T J)) * step = -J^T r
        let mut jtj = vec![vec![0.0; n_params]; n_params];
        let mut jtr = vec![0.0; n_params];
        for (residual_index, residual) in current.iter().enumerate() {
            for p in 0..n_params {
                let jp = jacobian
                    .get(residual_index)
                    .and_then(|row| row.get(p))
                    .copied()
                    .unwrap_or(0.0);
                if let Some(jtr_p) = jtr.get_mut(p) {
                    *jtr_p += jp * residual;
                }
                for q in p..n_params {
                    let jq = jacobian
                        .get(residual_index)
                        .and_then(|row| row.get(q))
                        .copied()
                        .unwrap_or(0.0);
                    if let Some(cell) = jtj.get_mut(p).and_then(|row| row.get_mut(q)) {
                        *cell += jp * jq;
                    }
                }
            }
        }
        for p in 0..n_params {
            for q in 0..p {
                let upper = jtj.get(q).and_then(|row| row.get(p)).copied().unwrap_or(0.0);
                if let Some(cell) = jtj.get_mut(p).and_then(|row| row.get_mut(q)) {
                    *cell = upper;
                }
            }
        }

        let mut improved = false;
        for _ in 0..10 {
            let mut damped = jtj.clone();
            for (p, row) in damped.iter_mut().enumerate() {
                if let Some(diag) = row.get_mut(p) {
                    *diag *= 1.0 + lambda;
                    if diag.abs() < 1e-300 {
                        *diag = lambda.max(1e-12);
                    }
                }
            }
            let rhs: Vec<f64> = jtr.iter().map(|v| -v).collect();

            let Ok(step) = solve_linear(damped, rhs) else {
                lambda *= 10.0;
                continue;
            };

            let trial: Vec<f64> = params
                .iter()
                .zip(step.iter())
                .map(|(p, s)| p + s)
                .collect();
            let trial_residuals = residuals(&trial);
            let trial_cost = sum_of_squares(&trial_residuals);

            if trial_cost.is_finite() && trial_cost < cost {
                let step_norm = step.iter().map(|s| s * s).sum::<f64>().sqrt();
                let relative_gain = (cost - trial_cost) / cost.max(1e-300);

                params = trial;
                current = trial_residuals;
                cost = trial_cost;
                lambda = (lambda / 10.0).max(1e-12);
                improved = true;

                if relative_gain < tolerance || step_norm < tolerance {
                    return Ok(params);
                }
                break;
            }
            lambda *= 10.0;
        }

        if !improved {
            // Damping saturated; the current point is the best available
            return Ok(params);
        }
    }

    Ok(params)
}

fn numeric_jacobian<F>(residuals: &F, params: &[f64], current: &[f64]) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let n_params = params.len();
    let mut jacobian = vec![vec![0.0; n_params]; current.len()];

    for p in 0..n_params {
        let base = params.get(p).copied().unwrap_or(0.0);
        let h = 1e-7 * base.abs().max(1.0);
        let mut perturbed = params.to_vec();
        if let Some(value) = perturbed.get_mut(p) {
            *value = base + h;
        }
        let shifted = residuals(&perturbed);
        for (residual_index, row) in jacobian.iter_mut().enumerate() {
            let r0 = current.get(residual_index).copied().unwrap_or(0.0);
            let r1 = shifted.get(residual_index).copied().unwrap_or(0.0);
            if let Some(cell) = row.get_mut(p) {
                *cell = (r1 - r0) / h;
            }
        }
    }

    jacobian
}

fn sum_of_squares(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum()
}
