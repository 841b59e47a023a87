//! Yeast cell detection and fluorescence quantification for microscopy image stacks
//!
//! The system locates cell boundaries in brightfield frames using radial edge
//! detection, fits ellipses to the detected boundaries, tracks cells across
//! frames, and measures fluorescence statistics inside each fitted ellipse.

#![deny(unsafe_code)]

/// Cell boundary detection, fluorescence measurement, and frame tracking
pub mod detection;
/// Ellipse representation and fitting methods
pub mod geometry;
/// Input/output operations and error handling
pub mod io;
/// Mathematical utilities for linear algebra, optimization, and statistics
pub mod math;

pub use io::error::{MeasureError, Result};
