/// Selection management, configuration, and frame-by-frame cell tracking
pub mod analyzer;
/// Per-cell measurement assembly in physical units
pub mod cell;
/// Radial edge detection of cell boundaries in brightfield frames
pub mod edge;
/// Fluorescence statistics inside a fitted ellipse
pub mod fluorescence;
