//! Pipeline constants and runtime configuration defaults

// Edge detection geometry
/// Number of radial sampling directions around a seed point
pub const ANGULAR_SAMPLES: usize = 360;

/// Minimum surviving edge points for a cell to count as found
pub const MIN_EDGE_POINTS: usize = 150;

/// Margin from the frame border that detected edge points must respect, in pixels
pub const BORDER_MARGIN: f64 = 2.0;

// Background estimation region, matching the central crop of the frame
/// Pixels excluded from the low side of the background region
pub const BACKGROUND_MARGIN_LOW: usize = 50;
/// Pixels excluded from the high side of the background region
pub const BACKGROUND_MARGIN_HIGH: usize = 100;

// Edge filtering thresholds
/// Standard deviations tolerated around the mean edge radius
pub const RADIUS_OUTLIER_SIGMA: f64 = 2.0;
/// Valid points accumulated per window in the local jump filter
pub const JUMP_WINDOW_POINTS: usize = 20;

// Default values for configurable parameters
/// Camera pixel size in micrometers per pixel
pub const DEFAULT_PIXEL_SIZE: f64 = 0.0645;

/// Maximum cell radius in micrometers
pub const DEFAULT_CELL_RADIUS_UM: f64 = 4.0;

/// Maximum cell edge width in micrometers
pub const DEFAULT_EDGE_SIZE_UM: f64 = 1.0;

/// Minimum relative intensity drop for an edge, in percent of background
pub const DEFAULT_EDGE_REL_MIN: f64 = 30.0;

/// Brightfield channel index
pub const DEFAULT_BF_CHANNEL: usize = 0;

/// Fluorescence channel index
pub const DEFAULT_FL_CHANNEL: usize = 1;

/// Distance in pixels within which a click matches an existing selection
pub const DEFAULT_SELECTION_RADIUS: f64 = 10.0;

// Output settings
/// Points sampled when rendering a fitted ellipse outline
pub const ELLIPSE_OUTLINE_SAMPLES: usize = 360;

/// Half-length of the centroid cross drawn on overlays, in pixels
pub const OVERLAY_CROSS_HALF_LENGTH: i64 = 5;

/// Suffix added to measurement report filenames
pub const OUTPUT_SUFFIX: &str = "_measurements";

/// Suffix added to selection input filenames
pub const SELECTIONS_SUFFIX: &str = "_selections";

/// Suffix added to overlay image filenames
pub const OVERLAY_SUFFIX: &str = "_overlay";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
