//! Fitted ellipse value type
//!
//! Stores the five fitted parameters together with the boundary points they
//! were fitted to, so goodness-of-fit measures can be computed after the fact.

use crate::geometry::fit::{FitMethod, ellipse_residual, fit_parameters};
use crate::io::error::Result;
use crate::math::statistics;
use ndarray::Array2;

/// A fitted ellipse in pixel coordinates
///
/// Parameters are [`x_center`, `y_center`, `semi_axis_a`, `semi_axis_b`,
/// `angle_radians`]. The axis ordering is whatever the fit produced; the
/// accessors sort them into semi-major and semi-minor.
#[derive(Debug, Clone)]
pub struct Ellipse {
    params: [f64; 5],
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Ellipse {
    /// Fit an ellipse to boundary points with the given method
    ///
    /// # Errors
    ///
    /// Returns an error if the point counts differ, fewer than five points are
    /// supplied, or the fit does not produce a valid ellipse.
    pub fn fit(x: Vec<f64>, y: Vec<f64>, method: FitMethod) -> Result<Self> {
        let params = fit_parameters(&x, &y, method)?;
        Ok(Self { params, x, y })
    }

    /// Construct an ellipse directly from known parameters
    ///
    /// Goodness-of-fit accessors return NaN since no boundary points exist.
    pub const fn from_parameters(params: [f64; 5]) -> Self {
        Self {
            params,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// The fitted parameter vector
    pub const fn parameters(&self) -> &[f64; 5] {
        &self.params
    }

    /// Center x coordinate in pixels
    pub const fn x_center(&self) -> f64 {
        self.params[0]
    }

    /// Center y coordinate in pixels
    pub const fn y_center(&self) -> f64 {
        self.params[1]
    }

    /// The larger semi-axis in pixels
    pub fn semi_major(&self) -> f64 {
        self.params[2].max(self.params[3])
    }

    /// The smaller semi-axis in pixels
    pub fn semi_minor(&self) -> f64 {
        self.params[2].min(self.params[3])
    }

    /// Orientation of the semi-major axis in degrees
    ///
    /// When the fit stored the axes in minor-major order the reported angle is
    /// rotated by 90 degrees so it always refers to the major axis.
    pub fn angle_degrees(&self) -> f64 {
        let a = self.params[2];
        let b = self.params[3];
        let degrees = self.params[4].to_degrees();
        if b > a { degrees + 90.0 } else { degrees }
    }

    /// Sample evenly spaced points along the ellipse outline
    ///
    /// The first and last points coincide, matching a closed polygon.
    pub fn outline_points(&self, n_points: usize) -> (Vec<f64>, Vec<f64>) {
        let a = self.semi_major();
        let b = self.semi_minor();
        let angle = self.angle_degrees().to_radians();
        let cos_angle = angle.cos();
        let sin_angle = angle.sin();

        let mut x_points = Vec::with_capacity(n_points);
        let mut y_points = Vec::with_capacity(n_points);
        let denominator = (n_points.saturating_sub(1)).max(1) as f64;

        for i in 0..n_points {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / denominator;
            let x_local = a * theta.cos();
            let y_local = b * theta.sin();
            x_points.push(x_local.mul_add(cos_angle, self.x_center() - y_local * sin_angle));
            y_points.push(x_local.mul_add(sin_angle, self.y_center() + y_local * cos_angle));
        }

        (x_points, y_points)
    }

    /// Boolean mask of the pixels inside the ellipse for an image of the given size
    pub fn mask(&self, height: usize, width: usize) -> Array2<bool> {
        let cos_angle = self.angle_degrees().to_radians().cos();
        let sin_angle = self.angle_degrees().to_radians().sin();
        let a = self.semi_major();
        let b = self.semi_minor();

        Array2::from_shape_fn((height, width), |(row, col)| {
            let x = col as f64 - self.x_center();
            let y = row as f64 - self.y_center();
            let x_rot = x.mul_add(cos_angle, y * sin_angle);
            let y_rot = x.mul_add(-sin_angle, y * cos_angle);
            let term_a = x_rot / a;
            let term_b = y_rot / b;
            term_a.mul_add(term_a, term_b * term_b) <= 1.0
        })
    }

    /// Coefficient of determination of the fit against the boundary points
    pub fn r_squared(&self) -> f64 {
        let ss_residual: f64 = self
            .x
            .iter()
            .zip(self.y.iter())
            .map(|(&xi, &yi)| {
                let r = ellipse_residual(&self.params, xi, yi);
                r * r
            })
            .sum();
        let y_mean = statistics::mean(&self.y);
        let ss_total: f64 = self.y.iter().map(|&yi| (yi - y_mean) * (yi - y_mean)).sum();
        1.0 - ss_residual / ss_total
    }

    /// Standard deviation of the implicit residual over the boundary points
    pub fn residual_std(&self) -> f64 {
        let residuals: Vec<f64> = self
            .x
            .iter()
            .zip(self.y.iter())
            .map(|(&xi, &yi)| ellipse_residual(&self.params, xi, yi))
            .collect();
        statistics::standard_deviation(&residuals)
    }
}
