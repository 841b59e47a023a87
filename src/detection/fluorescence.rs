//! Fluorescence statistics inside a fitted ellipse

use crate::geometry::ellipse::Ellipse;
use crate::math::statistics;
use ndarray::ArrayView2;

/// Summary statistics of the fluorescence signal within one cell
#[derive(Debug, Clone, Copy)]
pub struct FluorescenceStats {
    /// Channel index the statistics were measured on
    pub channel: usize,
    /// Mean intensity of the pixels inside the ellipse
    pub mean: f64,
    /// Population standard deviation of the pixels inside the ellipse
    pub sd: f64,
    /// Median intensity of the pixels inside the ellipse
    pub median: f64,
}

/// Measure fluorescence statistics of a channel plane inside the fitted ellipse
pub fn measure_channel(
    plane: ArrayView2<'_, f64>,
    ellipse: &Ellipse,
    channel: usize,
) -> FluorescenceStats {
    let (height, width) = plane.dim();
    let mask = ellipse.mask(height, width);

    let inside: Vec<f64> = plane
        .iter()
        .zip(mask.iter())
        .filter_map(|(&value, &keep)| keep.then_some(value))
        .collect();

    FluorescenceStats {
        channel,
        mean: statistics::mean(&inside),
        sd: statistics::standard_deviation(&inside),
        median: statistics::median(&inside),
    }
}
