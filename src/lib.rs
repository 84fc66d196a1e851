//! Anti-aliased scanline fill and stroke rasterizer
//!
//! Paths whose vertices lie millions of units outside the canvas render in
//! time bounded by the canvas, not by the magnitude of the coordinates.
//!
//! # Example
//!
//!     use scanfill::{Path, Pixfmt, RenderingBase, Rgb8, Rgba8, StrokeStyle, LineCap, FillRule};
//!
//!     let pix = Pixfmt::<Rgb8>::new(100, 100);
//!     let mut ren_base = RenderingBase::new(pix);
//!     ren_base.clear(Rgba8::white());
//!
//!     let mut path = Path::new();
//!     path.move_to(10.0, 10.0);
//!     path.line_to(50.0, 90.0);
//!     path.line_to(90.0, 10.0);
//!     path.close_polygon();
//!
//!     scanfill::fill(&path, FillRule::NonZero, Rgba8::new(0,0,255,255), &mut ren_base).unwrap();
//!
//!     let mut style = StrokeStyle::new(2.0);
//!     style.line_cap(LineCap::Butt);
//!     style.dash(&[10.0, 5.0], 0.0);
//!     scanfill::stroke(&path, &style, Rgba8::new(255,0,0,255), &mut ren_base).unwrap();
//!
//! # How does this work
//!
//! ```text
//!   Path / Shape
//!     Flattener          curves -> polylines, culled against the clip box
//!     Dash + Stroker     polylines -> closed outline polygons (stroke only)
//!     Clip               polygon -> vertices inside canvas + margin
//!     Rasterize          edges -> coverage spans per scanline
//!       ScanlineRasterizer      edge table + active edge list
//!       RasterizerScanlineAA    cells with cover and area
//!     CoverageBuffer     spans for every row
//!   Render to Image
//!     render_scanline_aa_solid
//!       RenderingBase::blend_solid_hspan (clipped to canvas)
//!         Pixel::blend_pix
//! ```

pub mod paths;
pub mod shapes;
pub mod flatten;
pub mod dash;
pub mod stroke;
pub mod clip;
pub mod cell;
pub mod edge;
pub mod raster;
pub mod scan;
pub mod color;
pub mod math;
pub mod buffer;
pub mod pixfmt;
pub mod base;
pub mod render;
pub mod config;
pub mod error;
pub mod file;

pub use crate::paths::*;
pub use crate::shapes::*;
pub use crate::flatten::*;
pub use crate::dash::*;
pub use crate::stroke::*;
pub use crate::clip::*;
pub use crate::cell::*;
pub use crate::edge::*;
pub use crate::raster::*;
pub use crate::scan::*;
pub use crate::color::*;
pub use crate::math::*;
pub use crate::buffer::*;
pub use crate::pixfmt::*;
pub use crate::base::*;
pub use crate::render::*;
pub use crate::config::*;
pub use crate::error::*;

const POLY_SUBPIXEL_SHIFT : i64 = 8;
const POLY_SUBPIXEL_SCALE : i64 = 1<<POLY_SUBPIXEL_SHIFT;
const POLY_SUBPIXEL_MASK  : i64 = POLY_SUBPIXEL_SCALE - 1;

/// Access raw component data of an Image
pub trait PixelData {
    fn pixeldata(&self) -> &[u8];
}

/// Color Interface, components in [0,1] and [0,255]
pub trait Color: std::fmt::Debug + Copy {
    fn red(&self) -> f64;
    fn green(&self) -> f64;
    fn blue(&self) -> f64;
    fn alpha(&self) -> f64;
    fn red8(&self) -> u8;
    fn green8(&self) -> u8;
    fn blue8(&self) -> u8;
    fn alpha8(&self) -> u8;
}

/// Canvas Interface
///
/// Anything with a width, height and per-pixel read and write access can be
/// drawn onto. Pixel locations are `(x, y)` with `(0,0)` at the top left.
pub trait Pixel {
    /// Width in pixels
    fn width(&self) -> usize;
    /// Height in pixels
    fn height(&self) -> usize;
    /// Read the pixel at `id`
    fn get(&self, id: (usize, usize)) -> color::Rgba8;
    /// Overwrite the pixel at `id` with color `c`
    fn set<C: Color>(&mut self, id: (usize, usize), c: C);
    /// Blend color `c` into the pixel at `id` with coverage `cover` in [0,255]
    ///
    /// Computes `dst = dst * (1 - a) + c * a` with `a = alpha(c) * cover`
    fn blend_pix<C: Color>(&mut self, id: (usize, usize), c: C, cover: u8) {
        let alpha = math::multiply_u8(c.alpha8(), cover);
        if alpha == 0 {
            return;
        }
        let p = self.get(id);
        let pix = color::Rgba8::new(math::lerp_u8(p.r, c.red8(),   alpha),
                                    math::lerp_u8(p.g, c.green8(), alpha),
                                    math::lerp_u8(p.b, c.blue8(),  alpha),
                                    math::prelerp_u8(p.a, alpha,   alpha));
        self.set(id, pix);
    }
}

/// Receiver of clipped line segments
pub trait LineSink {
    fn line(&mut self, a: Point, b: Point);
}

/// Rasterizer Interface
///
/// Polygons are added with `move_to_d`, `line_to_d` and `close_polygon`,
/// in pixel units. Every line passes through the clipper before it becomes
/// an edge or a cell; the clip box must be set before adding geometry.
pub trait Rasterize {
    /// Remove all geometry
    fn reset(&mut self);
    /// Set the region geometry is clipped to
    fn clip_box(&mut self, r: Rectangle<f64>);
    /// Set the filling rule
    fn filling_rule(&mut self, rule: FillRule);
    /// Begin a new polygon at (x,y), closing the previous one
    fn move_to_d(&mut self, x: f64, y: f64);
    /// Add a line from the current point to (x,y)
    fn line_to_d(&mut self, x: f64, y: f64);
    /// Close the current polygon back to its first point
    fn close_polygon(&mut self);
    /// Prepare for `sweep_scanline`, returns false if nothing was drawn
    fn rewind_scanlines(&mut self) -> bool;
    /// Fill `sl` with the next non-empty scanline, returns false when done
    fn sweep_scanline(&mut self, sl: &mut Scanline) -> bool;
    /// Number of edges or cells currently held
    fn primitives(&self) -> usize;
    /// Minimum pixel column touched by geometry
    fn min_x(&self) -> i64;
    /// Maximum pixel column touched by geometry
    fn max_x(&self) -> i64;
    /// Add a closed polygon
    fn add_polygon(&mut self, pts: &[Point]) {
        if let Some((first, rest)) = pts.split_first() {
            self.move_to_d(first.x, first.y);
            for p in rest {
                self.line_to_d(p.x, p.y);
            }
            self.close_polygon();
        }
    }
}
