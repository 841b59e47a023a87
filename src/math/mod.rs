/// Real 3x3 matrix operations and eigenpair extraction
pub mod eigen;
/// Linear solving and Levenberg-Marquardt minimization
pub mod fitting;
/// Descriptive statistics over pixel samples
pub mod statistics;
