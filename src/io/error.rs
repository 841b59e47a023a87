//! Error types for measurement operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all measurement operations
#[derive(Debug)]
pub enum MeasureError {
    /// Failed to load a TIFF stack from the filesystem
    StackLoad {
        /// Path to the stack file
        path: PathBuf,
        /// Underlying TIFF decoding error
        source: tiff::TiffError,
    },

    /// Stack contents do not meet pipeline requirements
    InvalidStack {
        /// Description of what's wrong with the stack
        reason: String,
    },

    /// Failed to read the seed point selection file
    SelectionLoad {
        /// Path to the selection file
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Failed to write the measurement report
    ReportExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying CSV error
        source: csv::Error,
    },

    /// Failed to save an overlay image to disk
    OverlayExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Measurement parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical computation produced an invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackLoad { path, source } => {
                write!(f, "Failed to load stack '{}': {source}", path.display())
            }
            Self::InvalidStack { reason } => {
                write!(f, "Invalid stack: {reason}")
            }
            Self::SelectionLoad { path, source } => {
                write!(
                    f,
                    "Failed to read selections '{}': {source}",
                    path.display()
                )
            }
            Self::ReportExport { path, source } => {
                write!(f, "Failed to write report '{}': {source}", path.display())
            }
            Self::OverlayExport { path, source } => {
                write!(
                    f,
                    "Failed to export overlay to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for MeasureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StackLoad { source, .. } => Some(source),
            Self::SelectionLoad { source, .. } | Self::ReportExport { source, .. } => Some(source),
            Self::OverlayExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for measurement results
pub type Result<T> = std::result::Result<T, MeasureError>;

impl From<std::io::Error> for MeasureError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MeasureError {
    MeasureError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> MeasureError {
    MeasureError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

/// Create a generic path validation error
pub fn io_error(msg: &str) -> MeasureError {
    MeasureError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
