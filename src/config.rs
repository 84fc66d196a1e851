//! Rendering Configuration

use crate::raster::FillRule;
use crate::flatten::DEFAULT_TOLERANCE;
use crate::paths::Point;
use crate::error::Error;
use crate::error::Result;

/// Adjustment of stroke geometry
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum StrokeControl {
    /// Geometry is used unmodified
    Pure,
    /// Vertices are moved onto pixel centers (antialiased) or pixel
    /// quarters (aliased) for more uniform lines
    Normalize,
}

impl Default for StrokeControl {
    fn default() -> Self {
        StrokeControl::Pure
    }
}

impl StrokeControl {
    /// Adjust a point
    pub fn apply(&self, p: Point, antialiasing: bool) -> Point {
        match self {
            StrokeControl::Pure => p,
            StrokeControl::Normalize if antialiasing =>
                Point::new(p.x.floor() + 0.5, p.y.floor() + 0.5),
            StrokeControl::Normalize =>
                Point::new((p.x + 0.25).floor() + 0.25, (p.y + 0.25).floor() + 0.25),
        }
    }
}

/// Rasterizer implementation
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Backend {
    /// Edge table with an active edge list and 16 sub-scanlines per row,
    /// [ScanlineRasterizer](../edge/struct.ScanlineRasterizer.html)
    Scanline,
    /// Exact area coverage per cell,
    /// [RasterizerScanlineAA](../raster/struct.RasterizerScanlineAA.html)
    ///
    /// Coverage is the summed signed area of every edge in a pixel, so
    /// overlapping copies of a shape add up. Under the nonzero rule a
    /// duplicated subpath leaves fully covered and empty pixels unchanged
    /// but can darken partially covered ones.
    Cell,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Scanline
    }
}

/// Rendering Options
///
/// # Example
///
///     use scanfill::{RenderConfig, Backend, FillRule};
///
///     let config = RenderConfig::default()
///         .antialiasing(false)
///         .fill_rule(FillRule::EvenOdd)
///         .backend(Backend::Cell);
///     assert!(config.validate().is_ok());
///
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct RenderConfig {
    /// Antialiasing, on by default
    pub antialiasing: bool,
    /// Fill rule used by `Renderer::fill`, NonZero by default
    pub fill_rule: FillRule,
    /// Stroke geometry adjustment, Pure by default
    pub stroke_control: StrokeControl,
    /// Rasterizer, Scanline by default
    pub backend: Backend,
    /// Curve flattening tolerance in pixels, 0.25 by default
    pub tolerance: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            antialiasing: true,
            fill_rule: FillRule::NonZero,
            stroke_control: StrokeControl::Pure,
            backend: Backend::Scanline,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl RenderConfig {
    pub fn antialiasing(mut self, on: bool) -> Self {
        self.antialiasing = on;
        self
    }
    pub fn fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }
    pub fn stroke_control(mut self, control: StrokeControl) -> Self {
        self.stroke_control = control;
        self
    }
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
    /// Tolerance must be positive and finite
    pub fn validate(&self) -> Result<()> {
        if ! (self.tolerance > 0.0) || ! self.tolerance.is_finite() {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }
}
