//! Radial edge detection of cell boundaries in brightfield frames
//!
//! From a seed point, pixel intensities are sampled along 360 radial lines.
//! Along each line a sliding window locates the strongest bright-to-dark
//! intensity drop, which marks the cell wall in brightfield images. A sequence
//! of statistical filters then removes false detections before the surviving
//! points are handed to the ellipse fit.

use crate::io::configuration::{
    ANGULAR_SAMPLES, BACKGROUND_MARGIN_HIGH, BACKGROUND_MARGIN_LOW, BORDER_MARGIN,
    JUMP_WINDOW_POINTS, MIN_EDGE_POINTS, RADIUS_OUTLIER_SIGMA,
};
use crate::math::statistics;
use ndarray::ArrayView2;

/// Pixel-space parameters for one edge detection pass
#[derive(Debug, Clone, Copy)]
pub struct EdgeParams {
    /// Maximum cell radius in pixels; radial lines sample this far
    pub cell_radius: usize,
    /// Sliding window width in pixels, the maximum expected edge thickness
    pub edge_size: usize,
    /// Minimum intensity drop relative to background, in percent
    pub edge_rel_min: f64,
}

/// Per-angle edge detection results with the final validity verdict
#[derive(Debug, Clone)]
pub struct EdgeProfile {
    /// Whether each angle retained a valid edge point after filtering
    pub found: Vec<bool>,
    /// Edge point x coordinates per angle
    pub x: Vec<f64>,
    /// Edge point y coordinates per angle
    pub y: Vec<f64>,
    /// Distance from the seed point per angle
    pub radius: Vec<f64>,
    /// Intensity drop magnitude per angle
    pub difference: Vec<f64>,
    /// Edge thickness in pixels per angle
    pub edge_width: Vec<f64>,
    /// Intensity drop per pixel of edge thickness per angle
    pub slope: Vec<f64>,
    /// Estimated background intensity of the frame
    pub background: f64,
    /// Whether enough consistent edge points survived to call this a cell
    pub cell_found: bool,
    /// Mean edge thickness in pixels over the surviving points
    pub mean_edge_width: f64,
}

impl EdgeProfile {
    /// Coordinates of the surviving edge points
    pub fn edge_points(&self) -> (Vec<f64>, Vec<f64>) {
        let mut x_points = Vec::new();
        let mut y_points = Vec::new();
        for ((&found, &x), &y) in self.found.iter().zip(self.x.iter()).zip(self.y.iter()) {
            if found {
                x_points.push(x);
                y_points.push(y);
            }
        }
        (x_points, y_points)
    }

    /// Number of surviving edge points
    pub fn count(&self) -> usize {
        self.found.iter().filter(|&&f| f).count()
    }
}

/// Estimate the background intensity of a frame
///
/// Uses the mode of a central region (margins exclude vignetted borders and
/// scale bars); falls back to the median when the mode is zero. Frames too
/// small for the margins use the whole frame.
pub fn estimate_background(frame: ArrayView2<'_, f64>) -> f64 {
    let (height, width) = frame.dim();

    let usable = height > BACKGROUND_MARGIN_LOW + BACKGROUND_MARGIN_HIGH
        && width > BACKGROUND_MARGIN_LOW + BACKGROUND_MARGIN_HIGH;
    let region: Vec<f64> = if usable {
        frame
            .slice(ndarray::s![
                BACKGROUND_MARGIN_LOW..height - BACKGROUND_MARGIN_HIGH,
                BACKGROUND_MARGIN_LOW..width - BACKGROUND_MARGIN_HIGH
            ])
            .iter()
            .copied()
            .collect()
    } else {
        frame.iter().copied().collect()
    };

    let background = statistics::mode(&region);
    if background == 0.0 {
        statistics::median(&region)
    } else {
        background
    }
}

/// Detect the cell boundary around a seed point in a brightfield frame
pub fn detect(frame: ArrayView2<'_, f64>, x_seed: f64, y_seed: f64, params: &EdgeParams) -> EdgeProfile {
    let (height, width) = frame.dim();
    let background = estimate_background(frame);

    let mut profile = EdgeProfile {
        found: vec![false; ANGULAR_SAMPLES],
        x: vec![0.0; ANGULAR_SAMPLES],
        y: vec![0.0; ANGULAR_SAMPLES],
        radius: vec![0.0; ANGULAR_SAMPLES],
        difference: vec![0.0; ANGULAR_SAMPLES],
        edge_width: vec![0.0; ANGULAR_SAMPLES],
        slope: vec![0.0; ANGULAR_SAMPLES],
        background,
        cell_found: false,
        mean_edge_width: 0.0,
    };

    let mut sample_x = vec![0_i64; params.cell_radius + 1];
    let mut sample_y = vec![0_i64; params.cell_radius + 1];
    let mut sample_value = vec![0.0_f64; params.cell_radius + 1];

    for angle in 0..ANGULAR_SAMPLES {
        let alpha = angle as f64 * std::f64::consts::PI / 180.0;
        let cos_alpha = alpha.cos();
        let sin_alpha = alpha.sin();

        // Sample pixel intensities along the radial line; out-of-bounds
        // samples read as background so edges never form outside the frame
        for i in 0..=params.cell_radius {
            let px = (i as f64).mul_add(cos_alpha, x_seed).round() as i64;
            let py = (i as f64).mul_add(sin_alpha, y_seed).round() as i64;
            if let Some(slot) = sample_x.get_mut(i) {
                *slot = px;
            }
            if let Some(slot) = sample_y.get_mut(i) {
                *slot = py;
            }
            let value = if px >= 0 && (px as usize) < width && py >= 0 && (py as usize) < height {
                frame
                    .get((py as usize, px as usize))
                    .copied()
                    .unwrap_or(background)
            } else {
                background
            };
            if let Some(slot) = sample_value.get_mut(i) {
                *slot = value;
            }
        }

        let mut limit_index = 0_usize;
        let mut max_difference = 0.0_f64;
        let mut best_edge_width = 0.0_f64;

        // Slide a window along the line and keep the strongest max-to-min drop
        for i in 0..(params.cell_radius + 1).saturating_sub(params.edge_size) {
            let window = sample_value.get(i..i + params.edge_size).unwrap_or(&[]);
            let Some(position_max) = argmax(window) else {
                continue;
            };
            let position_min = window
                .get(position_max..)
                .and_then(argmin_of)
                .map_or(position_max, |p| p + position_max);

            if position_max < position_min {
                let current_max = window.get(position_max).copied().unwrap_or(0.0);
                let current_min = window.get(position_min).copied().unwrap_or(0.0);
                let current_difference = current_max - current_min;
                let relative_difference = 100.0 * current_difference / background;

                if current_difference > max_difference && relative_difference > params.edge_rel_min
                {
                    if let Some(slot) = profile.found.get_mut(angle) {
                        *slot = true;
                    }
                    limit_index = i + usize::midpoint(position_max, position_min);
                    max_difference = current_difference;
                    best_edge_width = (position_min - position_max) as f64;
                }
            }
        }

        if profile.found.get(angle).copied().unwrap_or(false) {
            let edge_x = sample_x.get(limit_index).copied().unwrap_or(0) as f64;
            let edge_y = sample_y.get(limit_index).copied().unwrap_or(0) as f64;
            let dx = edge_x - x_seed;
            let dy = edge_y - y_seed;
            set(&mut profile.x, angle, edge_x);
            set(&mut profile.y, angle, edge_y);
            set(&mut profile.radius, angle, dx.hypot(dy));
            set(&mut profile.difference, angle, max_difference);
            set(&mut profile.edge_width, angle, best_edge_width);
            set(&mut profile.slope, angle, max_difference / best_edge_width);
        }
    }

    apply_filters(&mut profile, height, width);
    profile
}

// Filter chain: global radius outliers, local radius jumps, weak differences,
// shallow slopes, then the final count and bounds checks
fn apply_filters(profile: &mut EdgeProfile, height: usize, width: usize) {
    let found_radii = masked(&profile.radius, &profile.found);
    if found_radii.is_empty() {
        return;
    }

    // Step 1: radius-based global outlier removal
    let mean_radius = statistics::mean(&found_radii);
    let sdev_radius = statistics::standard_deviation(&found_radii);
    for (found, &radius) in profile.found.iter_mut().zip(profile.radius.iter()) {
        if *found
            && !(radius >= RADIUS_OUTLIER_SIGMA.mul_add(-sdev_radius, mean_radius)
                && radius <= RADIUS_OUTLIER_SIGMA.mul_add(sdev_radius, mean_radius))
        {
            *found = false;
        }
    }

    // Step 2: jump-based local outlier removal using a sliding angular window
    let mut angle = 0_usize;
    while angle < ANGULAR_SAMPLES - 1 {
        let mut window_count = 0_usize;
        let mut window_mean_radius = 0.0_f64;
        let mut span = 0_usize;

        while window_count < JUMP_WINDOW_POINTS && angle + span < ANGULAR_SAMPLES - 1 {
            if profile.found.get(angle + span).copied().unwrap_or(false) {
                window_mean_radius += profile.radius.get(angle + span).copied().unwrap_or(0.0);
                window_count += 1;
            }
            span += 1;
        }

        if window_count > 0 {
            window_mean_radius /= window_count as f64;
            for j in 0..=span {
                let index = angle + j;
                if index < ANGULAR_SAMPLES
                    && profile.found.get(index).copied().unwrap_or(false)
                    && profile.radius.get(index).copied().unwrap_or(0.0)
                        > window_mean_radius + sdev_radius
                {
                    set_bool(&mut profile.found, index, false);
                }
            }
            angle += span / 2 + 1;
        } else {
            angle += 1;
        }
    }

    // Step 3: difference filter removes weak edges
    let found_differences = masked(&profile.difference, &profile.found);
    let mean_difference = statistics::mean(&found_differences);
    let sdev_difference = statistics::standard_deviation(&found_differences);
    for (found, &difference) in profile.found.iter_mut().zip(profile.difference.iter()) {
        if *found && difference < mean_difference - sdev_difference {
            *found = false;
        }
    }

    // Step 4: slope filter removes shallow edges
    let found_slopes = masked(&profile.slope, &profile.found);
    let mean_slope = statistics::mean(&found_slopes);
    let sdev_slope = statistics::standard_deviation(&found_slopes);
    for (found, &slope) in profile.found.iter_mut().zip(profile.slope.iter()) {
        if *found && slope < mean_slope - sdev_slope {
            *found = false;
        }
    }

    // Step 5: enough edge points must survive
    profile.cell_found = profile.count() >= MIN_EDGE_POINTS;

    // Step 6: all surviving points must sit inside the frame borders
    if profile.cell_found {
        let x_limit = width as f64 - BORDER_MARGIN;
        let y_limit = height as f64 - BORDER_MARGIN;
        for ((&found, &x), &y) in profile
            .found
            .iter()
            .zip(profile.x.iter())
            .zip(profile.y.iter())
        {
            if found && !(x >= BORDER_MARGIN && x <= x_limit && y >= BORDER_MARGIN && y <= y_limit)
            {
                profile.cell_found = false;
                break;
            }
        }
    }

    // Step 7: mean edge width over the surviving points
    if profile.cell_found {
        profile.mean_edge_width = statistics::mean(&masked(&profile.edge_width, &profile.found));
    }
}

fn masked(values: &[f64], mask: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(mask.iter())
        .filter_map(|(&value, &keep)| keep.then_some(value))
        .collect()
}

fn set(values: &mut [f64], index: usize, value: f64) {
    if let Some(slot) = values.get_mut(index) {
        *slot = value;
    }
}

fn set_bool(values: &mut [bool], index: usize, value: bool) {
    if let Some(slot) = values.get_mut(index) {
        *slot = value;
    }
}

fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

fn argmin_of(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        match best {
            Some((_, best_value)) if value >= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}
