//! Algebraic and geometric least-squares ellipse fitting
//!
//! The algebraic path is the direct conic fit of Halir and Flusser: scatter
//! matrices reduce the constrained problem to a 3x3 eigenproblem whose single
//! valid eigenvector yields the conic coefficients. The geometric path
//! minimizes the implicit ellipse residual with Levenberg-Marquardt.

use crate::io::error::{Result, computation_error};
use crate::math::eigen::{self, Mat3};
use crate::math::fitting::levenberg_marquardt;

/// Ellipse fitting strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMethod {
    /// Direct least-squares conic fit (fast, non-iterative)
    #[default]
    Algebraic,
    /// Iterative minimization of the implicit ellipse residual
    Geometric,
}

/// Implicit ellipse residual for a single point
///
/// Zero on the ellipse, negative inside, positive outside. Parameters are
/// [`x_center`, `y_center`, `semi_axis_a`, `semi_axis_b`, `angle_radians`].
pub fn ellipse_residual(params: &[f64; 5], x: f64, y: f64) -> f64 {
    let [xc, yc, a, b, angle] = *params;
    let cos_angle = angle.cos();
    let sin_angle = angle.sin();

    let x_rot = (x - xc).mul_add(cos_angle, (y - yc) * sin_angle);
    let y_rot = (x - xc).mul_add(-sin_angle, (y - yc) * cos_angle);

    let term_a = x_rot / a;
    let term_b = y_rot / b;
    term_a.mul_add(term_a, term_b * term_b) - 1.0
}

/// Fit ellipse parameters with the requested method
///
/// # Errors
///
/// Returns an error if fewer than five points are supplied, if the scatter
/// matrices are singular, or if the best-fit conic is not an ellipse.
pub fn fit_parameters(x: &[f64], y: &[f64], method: FitMethod) -> Result<[f64; 5]> {
    if x.len() != y.len() {
        return Err(computation_error(
            "ellipse fit",
            &"x and y coordinate counts differ",
        ));
    }
    if x.len() < 5 {
        return Err(computation_error(
            "ellipse fit",
            &format!("need at least 5 boundary points, got {}", x.len()),
        ));
    }

    match method {
        FitMethod::Algebraic => fit_algebraic(x, y),
        FitMethod::Geometric => fit_geometric(x, y),
    }
}

fn fit_algebraic(x: &[f64], y: &[f64]) -> Result<[f64; 5]> {
    // Scatter matrices over the quadratic (x^2, xy, y^2) and linear (x, y, 1)
    // design vectors
    let mut s1: Mat3 = [[0.0; 3]; 3];
    let mut s2: Mat3 = [[0.0; 3]; 3];
    let mut s3: Mat3 = [[0.0; 3]; 3];

    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let d1 = [xi * xi, xi * yi, yi * yi];
        let d2 = [xi, yi, 1.0];
        for (i, row1) in s1.iter_mut().enumerate() {
            for (j, cell) in row1.iter_mut().enumerate() {
                *cell += d1[i] * d1[j];
            }
        }
        for (i, row2) in s2.iter_mut().enumerate() {
            for (j, cell) in row2.iter_mut().enumerate() {
                *cell += d1[i] * d2[j];
            }
        }
        for (i, row3) in s3.iter_mut().enumerate() {
            for (j, cell) in row3.iter_mut().enumerate() {
                *cell += d2[i] * d2[j];
            }
        }
    }

    let s3_inv = eigen::invert(&s3)
        .ok_or_else(|| computation_error("ellipse fit", &"singular linear scatter matrix"))?;
    let t = eigen::scale(&eigen::multiply(&s3_inv, &eigen::transpose(&s2)), -1.0);

    let mut m = eigen::multiply(&s2, &t);
    for (m_row, s1_row) in m.iter_mut().zip(s1.iter()) {
        for (cell, s1_cell) in m_row.iter_mut().zip(s1_row.iter()) {
            *cell += s1_cell;
        }
    }

    // Constraint matrix C = [[0,0,2],[0,-1,0],[2,0,0]], inverted analytically
    let c_inv: Mat3 = [[0.0, 0.0, 0.5], [0.0, -1.0, 0.0], [0.5, 0.0, 0.0]];
    let reduced = eigen::multiply(&c_inv, &m);

    // The valid conic is the eigenvector satisfying 4ac - b^2 > 0
    let mut quadratic_part: Option<[f64; 3]> = None;
    let mut best_constraint = 0.0;
    for pair in eigen::real_eigenpairs(&reduced) {
        let v = pair.vector;
        let constraint = 4.0 * v[0] * v[2] - v[1] * v[1];
        if constraint > best_constraint {
            best_constraint = constraint;
            quadratic_part = Some(v);
        }
    }
    let quadratic = quadratic_part
        .ok_or_else(|| computation_error("ellipse fit", &"no elliptical solution found"))?;

    let linear = eigen::mat_vec(&t, quadratic);
    let conic = [
        quadratic[0],
        quadratic[1],
        quadratic[2],
        linear[0],
        linear[1],
        linear[2],
    ];

    conic_to_parameters(conic)
}

// Converts conic coefficients Ax^2 + Bxy + Cy^2 + Dx + Ey + F = 0 into
// [x_center, y_center, semi_axis_a, semi_axis_b, angle]
fn conic_to_parameters(conic: [f64; 6]) -> Result<[f64; 5]> {
    let [a_coef, b_full, c_coef, d_full, e_full, f_coef] = conic;
    let b = b_full / 2.0;
    let d = d_full / 2.0;
    let e = e_full / 2.0;

    let den = b.mul_add(b, -(a_coef * c_coef));
    if den >= 0.0 {
        return Err(computation_error(
            "ellipse fit",
            &"conic coefficients do not describe an ellipse",
        ));
    }

    let x0 = (c_coef * d - b * e) / den;
    let y0 = (a_coef * e - b * d) / den;

    let numerator = 2.0
        * (a_coef * e * e + c_coef * d * d + f_coef * b * b
            - 2.0 * b * d * e
            - a_coef * c_coef * f_coef);
    let fac = (a_coef - c_coef)
        .mul_add(a_coef - c_coef, 4.0 * b * b)
        .sqrt();

    let a_squared = numerator / den / (fac - (a_coef + c_coef));
    let b_squared = numerator / den / (-fac - (a_coef + c_coef));
    if a_squared <= 0.0 || b_squared <= 0.0 {
        return Err(computation_error(
            "ellipse fit",
            &"degenerate ellipse axes",
        ));
    }

    let angle = if b.abs() < f64::EPSILON {
        if a_coef < c_coef {
            0.0
        } else {
            std::f64::consts::FRAC_PI_2
        }
    } else {
        let base = ((2.0 * b) / (a_coef - c_coef)).atan() / 2.0;
        if a_coef > c_coef {
            base + std::f64::consts::FRAC_PI_2
        } else {
            base
        }
    };

    Ok([x0, y0, a_squared.sqrt(), b_squared.sqrt(), angle])
}

fn fit_geometric(x: &[f64], y: &[f64]) -> Result<[f64; 5]> {
    let n = x.len() as f64;
    let x_center = x.iter().sum::<f64>() / n;
    let y_center = y.iter().sum::<f64>() / n;
    let x_half_range = (max_of(x) - min_of(x)) / 2.0;
    let y_half_range = (max_of(y) - min_of(y)) / 2.0;

    let initial = [
        x_center,
        y_center,
        x_half_range.max(1e-6),
        y_half_range.max(1e-6),
        0.0,
    ];

    let x_owned = x.to_vec();
    let y_owned = y.to_vec();
    let residuals = move |params: &[f64]| -> Vec<f64> {
        let p = [
            params.first().copied().unwrap_or(0.0),
            params.get(1).copied().unwrap_or(0.0),
            params.get(2).copied().unwrap_or(1.0),
            params.get(3).copied().unwrap_or(1.0),
            params.get(4).copied().unwrap_or(0.0),
        ];
        x_owned
            .iter()
            .zip(y_owned.iter())
            .map(|(&xi, &yi)| ellipse_residual(&p, xi, yi))
            .collect()
    };

    let solution = levenberg_marquardt(residuals, &initial, 200, 1e-12)
        .map_err(|e| computation_error("geometric ellipse fit", &e))?;

    Ok([
        solution.first().copied().unwrap_or(0.0),
        solution.get(1).copied().unwrap_or(0.0),
        solution.get(2).copied().unwrap_or(0.0).abs(),
        solution.get(3).copied().unwrap_or(0.0).abs(),
        solution.get(4).copied().unwrap_or(0.0),
    ])
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
