/// Command-line interface and batch file processing
pub mod cli;
/// Pipeline constants and runtime configuration defaults
pub mod configuration;
/// Error types for measurement operations
pub mod error;
/// PNG overlay rendering of fitted cells
pub mod overlay;
/// Progress display for batch measurement runs
pub mod progress;
/// CSV export of cell measurements
pub mod report;
/// CSV input of seed point selections
pub mod selections;
/// TIFF image stack loading
pub mod stack;
