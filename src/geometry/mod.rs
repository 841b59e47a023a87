/// Ellipse value type with sampling, masking, and goodness-of-fit accessors
pub mod ellipse;
/// Algebraic and geometric ellipse fitting
pub mod fit;
