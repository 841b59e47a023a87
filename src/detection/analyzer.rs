//! Selection management and frame-by-frame cell tracking
//!
//! An [`Analyzer`] holds seed selections grouped by their start frame and
//! tracks each selection forward through the stack, re-seeding every frame
//! from the previous fitted center until the cell is no longer found.

use crate::detection::cell::{CellMeasurement, measure_cell};
use crate::geometry::fit::FitMethod;
use crate::io::configuration::{
    DEFAULT_BF_CHANNEL, DEFAULT_CELL_RADIUS_UM, DEFAULT_EDGE_REL_MIN, DEFAULT_EDGE_SIZE_UM,
    DEFAULT_FL_CHANNEL, DEFAULT_PIXEL_SIZE, DEFAULT_SELECTION_RADIUS,
};
use crate::io::error::Result;
use crate::io::stack::ImageStack;
use std::collections::BTreeMap;

/// Parameters controlling detection, fitting, and unit conversion
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Physical pixel size in micrometers
    pub pixel_size: f64,
    /// Channel index of the brightfield signal used for edge detection
    pub bf_channel: usize,
    /// Channel indices measured for fluorescence
    pub fl_channels: Vec<usize>,
    /// Maximum expected cell radius in micrometers
    pub cell_radius: f64,
    /// Expected cell wall thickness in micrometers
    pub edge_size: f64,
    /// Minimum relative intensity drop for an edge, in percent of background
    pub edge_rel_min: f64,
    /// Ellipse fitting method
    pub method: FitMethod,
    /// Pixel radius within which a click removes an existing selection
    pub selection_radius: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            bf_channel: DEFAULT_BF_CHANNEL,
            fl_channels: vec![DEFAULT_FL_CHANNEL],
            cell_radius: DEFAULT_CELL_RADIUS_UM,
            edge_size: DEFAULT_EDGE_SIZE_UM,
            edge_rel_min: DEFAULT_EDGE_REL_MIN,
            method: FitMethod::default(),
            selection_radius: DEFAULT_SELECTION_RADIUS,
        }
    }
}

impl AnalysisConfig {
    /// Maximum cell radius in whole pixels, rounded up
    pub fn cell_radius_px(&self) -> usize {
        (self.cell_radius / self.pixel_size).ceil() as usize
    }

    /// Cell wall thickness in whole pixels, rounded up
    pub fn edge_size_px(&self) -> usize {
        (self.edge_size / self.pixel_size).ceil() as usize
    }
}

/// Seed selections and the tracking loop that measures them
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
    selections: BTreeMap<usize, Vec<(f64, f64)>>,
}

impl Analyzer {
    /// Create an analyzer with the given configuration and no selections
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            selections: BTreeMap::new(),
        }
    }

    /// Borrow the analysis configuration
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Add a seed selection on a start frame
    pub fn add_selection(&mut self, frame: usize, x: f64, y: f64) {
        self.selections.entry(frame).or_default().push((x, y));
    }

    /// Remove the selection on `frame` nearest to (x, y)
    ///
    /// Nothing is removed when no selection lies within the configured
    /// selection radius. Returns the removed seed point.
    pub fn remove_selection(&mut self, frame: usize, x: f64, y: f64) -> Option<(f64, f64)> {
        let seeds = self.selections.get_mut(&frame)?;
        let nearest = seeds
            .iter()
            .enumerate()
            .map(|(index, &(sx, sy))| (index, (sx - x).hypot(sy - y)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if nearest.1 > self.config.selection_radius {
            return None;
        }
        let removed = seeds.remove(nearest.0);
        if seeds.is_empty() {
            self.selections.remove(&frame);
        }
        Some(removed)
    }

    /// Whether a selection exists within the selection radius of (x, y)
    pub fn contains_selection(&self, frame: usize, x: f64, y: f64) -> bool {
        self.selections.get(&frame).is_some_and(|seeds| {
            seeds
                .iter()
                .any(|&(sx, sy)| (sx - x).hypot(sy - y) <= self.config.selection_radius)
        })
    }

    /// Remove all selections
    pub fn clear_selections(&mut self) {
        self.selections.clear();
    }

    /// All selections as (start frame, x, y) tuples in frame order
    pub fn selections(&self) -> Vec<(usize, f64, f64)> {
        self.selections
            .iter()
            .flat_map(|(&frame, seeds)| seeds.iter().map(move |&(x, y)| (frame, x, y)))
            .collect()
    }

    /// Number of seed selections across all frames
    pub fn selection_count(&self) -> usize {
        self.selections.values().map(Vec::len).sum()
    }

    /// Track one selection forward from its start frame
    ///
    /// Each successful measurement re-seeds the next frame from the fitted
    /// center. Tracking stops at the first frame where no cell is found.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured channel is missing from the stack or
    /// an ellipse fit fails.
    pub fn track_selection(
        &self,
        stack: &ImageStack,
        start_frame: usize,
        x: f64,
        y: f64,
        id: usize,
    ) -> Result<Vec<CellMeasurement>> {
        let mut measurements = Vec::new();
        let mut seed = (x, y);

        for frame in start_frame..stack.frames() {
            match measure_cell(stack, &self.config, frame, seed.0, seed.1, id)? {
                Some(cell) => {
                    seed = (
                        cell.x_centroid / self.config.pixel_size,
                        cell.y_centroid / self.config.pixel_size,
                    );
                    measurements.push(cell);
                }
                None => break,
            }
        }

        Ok(measurements)
    }

    /// Measure every selection, tracking each through the stack
    ///
    /// Selections are numbered in frame order starting from 1.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured channel is missing from the stack or
    /// an ellipse fit fails.
    pub fn fit_cells(&self, stack: &ImageStack) -> Result<Vec<CellMeasurement>> {
        let mut cells = Vec::new();
        for (id, (frame, x, y)) in self.selections().into_iter().enumerate() {
            cells.extend(self.track_selection(stack, frame, x, y, id + 1)?);
        }
        Ok(cells)
    }
}
