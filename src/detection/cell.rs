//! Per-cell measurement assembly in physical units
//!
//! Combines edge detection, ellipse fitting, and fluorescence measurement for
//! a single seed point on a single frame, converting pixel geometry into
//! micrometers with the configured pixel size.

use crate::detection::analyzer::AnalysisConfig;
use crate::detection::edge::{self, EdgeParams};
use crate::detection::fluorescence::{FluorescenceStats, measure_channel};
use crate::geometry::ellipse::Ellipse;
use crate::io::error::{Result, invalid_parameter};
use crate::io::stack::ImageStack;
use std::fmt;

/// A fully measured cell on one frame
#[derive(Debug, Clone)]
pub struct CellMeasurement {
    /// Identifier shared by all measurements tracked from one selection
    pub id: usize,
    /// Frame index the measurement was taken on
    pub frame: usize,
    /// Seed x coordinate in pixels
    pub x_selected: f64,
    /// Seed y coordinate in pixels
    pub y_selected: f64,
    /// Fitted center x coordinate in micrometers
    pub x_centroid: f64,
    /// Fitted center y coordinate in micrometers
    pub y_centroid: f64,
    /// Semi-major axis in micrometers
    pub semi_major: f64,
    /// Semi-minor axis in micrometers
    pub semi_minor: f64,
    /// Orientation of the semi-major axis in degrees
    pub angle: f64,
    /// Mean cell wall thickness in micrometers
    pub edge_width: f64,
    /// Spherical-equivalent volume in cubic micrometers
    pub volume: f64,
    /// The fitted ellipse in pixel coordinates
    pub ellipse: Ellipse,
    /// Fluorescence statistics per configured channel
    pub fluorescence: Vec<FluorescenceStats>,
}

/// Detect and measure a cell around a seed point on one frame
///
/// Returns `Ok(None)` when no consistent cell boundary is found, which is the
/// normal termination condition for frame tracking.
///
/// # Errors
///
/// Returns an error if the frame or a configured channel is out of range, or
/// if the ellipse fit fails on a detected boundary.
pub fn measure_cell(
    stack: &ImageStack,
    config: &AnalysisConfig,
    frame: usize,
    x_seed: f64,
    y_seed: f64,
    id: usize,
) -> Result<Option<CellMeasurement>> {
    let bf_plane = stack.plane(frame, config.bf_channel).ok_or_else(|| {
        invalid_parameter(
            "bf_channel",
            &config.bf_channel,
            &format!(
                "frame {frame} channel {} not present in a {}x{} stack",
                config.bf_channel,
                stack.frames(),
                stack.channels()
            ),
        )
    })?;

    let params = EdgeParams {
        cell_radius: config.cell_radius_px(),
        edge_size: config.edge_size_px(),
        edge_rel_min: config.edge_rel_min,
    };

    let profile = edge::detect(bf_plane, x_seed, y_seed, &params);
    if !profile.cell_found {
        return Ok(None);
    }

    let (edge_x, edge_y) = profile.edge_points();
    let ellipse = Ellipse::fit(edge_x, edge_y, config.method)?;

    let semi_major = config.pixel_size * ellipse.semi_major();
    let semi_minor = config.pixel_size * ellipse.semi_minor();
    let mean_radius = f64::midpoint(semi_major, semi_minor);
    let volume = 4.0 * std::f64::consts::PI * mean_radius.powi(3) / 3.0;

    let mut fluorescence = Vec::with_capacity(config.fl_channels.len());
    for &channel in &config.fl_channels {
        let plane = stack.plane(frame, channel).ok_or_else(|| {
            invalid_parameter(
                "fl_channel",
                &channel,
                &format!("channel {channel} not present in a {}-channel stack", stack.channels()),
            )
        })?;
        fluorescence.push(measure_channel(plane, &ellipse, channel));
    }

    Ok(Some(CellMeasurement {
        id,
        frame,
        x_selected: x_seed,
        y_selected: y_seed,
        x_centroid: config.pixel_size * ellipse.x_center(),
        y_centroid: config.pixel_size * ellipse.y_center(),
        semi_major,
        semi_minor,
        angle: ellipse.angle_degrees(),
        edge_width: config.pixel_size * profile.mean_edge_width,
        volume,
        ellipse,
        fluorescence,
    }))
}

impl fmt::Display for CellMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell {}: frame {}, centroid ({:.2}, {:.2}) um, axes {:.2} x {:.2} um, \
             angle {:.2} deg, edge width {:.2} um",
            self.id,
            self.frame,
            self.x_centroid,
            self.y_centroid,
            self.semi_major,
            self.semi_minor,
            self.angle,
            self.edge_width
        )
    }
}
