//! Seed point selection files
//!
//! Selections are stored as CSV with a `frame,x,y` header. Each record seeds
//! the tracker on one start frame; coordinates are in pixels.

use crate::io::error::{MeasureError, Result};
use serde::Deserialize;
use std::path::Path;

/// One seed point read from a selections file
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SelectionRecord {
    /// Frame index tracking starts on
    pub frame: usize,
    /// Seed x coordinate in pixels
    pub x: f64,
    /// Seed y coordinate in pixels
    pub y: f64,
}

/// Read all seed selections from a CSV file
///
/// # Errors
///
/// Returns an error when the file cannot be read or a record does not parse.
pub fn load_selections<P: AsRef<Path>>(path: P) -> Result<Vec<SelectionRecord>> {
    let path_buf = path.as_ref().to_path_buf();
    let selection_error = |source: csv::Error| MeasureError::SelectionLoad {
        path: path_buf.clone(),
        source,
    };

    let mut reader = csv::Reader::from_path(&path_buf).map_err(selection_error)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record.map_err(selection_error)?);
    }
    Ok(records)
}
