//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, PartialEq)]
pub enum GeodesyError {
    /// Unit name is not one of the supported units.
    #[error("unknown unit of measurement: {0}")]
    InvalidUnit(String),
    /// Distance to project a point by must not be negative.
    #[error("distance must not be negative, got {0}")]
    NegativeDistance(f64),
    /// Circle approximation needs at least 3 segments.
    #[error("circle must have at least 3 steps, got {0}")]
    InvalidSteps(usize),
    /// Geometry conversion error.
    #[error("invalid input geometry: {0}")]
    Conversion(String),
}
