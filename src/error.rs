//! Errors

use thiserror::Error;

/// Errors reported while configuring or saving a rendering
///
/// Invalid stroke and rendering parameters are reported before any geometry
/// is processed. Degenerate geometry is never an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid stroke width {0}, must be greater than 0")]
    InvalidWidth(f64),
    #[error("invalid miter limit {0}, must be at least 1")]
    InvalidMiterLimit(f64),
    #[error("invalid dash pattern: {0}")]
    InvalidDash(String),
    #[error("invalid flattening tolerance {0}, must be greater than 0")]
    InvalidTolerance(f64),
    #[error("invalid approximation scale {0}, must be greater than 0")]
    InvalidApproximationScale(f64),
    #[error("unsupported line cap: {0}")]
    UnsupportedCap(String),
    #[error("unsupported line join: {0}")]
    UnsupportedJoin(String),
    #[error("unsupported fill rule: {0}")]
    UnsupportedFillRule(String),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
