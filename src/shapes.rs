//! Shapes
//!
//! # Example
//!
//!     use scanfill::Shape;
//!
//!     let circle = Shape::Circle { cx: 50.0, cy: 50.0, r: 20.0 };
//!     let path = circle.to_path();
//!     assert_eq!(path.subpaths().len(), 1);
//!     assert_eq!(path.subpaths()[0].segments.len(), 4);
//!

use crate::paths::Path;

/// Distance of cubic control points for a quarter circle of radius 1
const KAPPA : f64 = 0.552_284_749_830_793_6;

/// Drawable Shape
#[derive(Debug,Clone,PartialEq)]
pub enum Shape {
    /// Arbitrary path
    Path(Path),
    /// Axis aligned rectangle with top left corner (x,y)
    Rect { x: f64, y: f64, w: f64, h: f64 },
    /// Circle centered on (cx,cy)
    Circle { cx: f64, cy: f64, r: f64 },
    /// Axis aligned ellipse centered on (cx,cy)
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
}

impl Shape {
    /// Convert to a Path
    ///
    /// Rectangles become closed four sided polygons, circles and ellipses
    /// four cubic Bezier arcs
    pub fn to_path(&self) -> Path {
        match *self {
            Shape::Path(ref p) => p.clone(),
            Shape::Rect { x, y, w, h } => {
                let mut p = Path::new();
                p.move_to(x,     y);
                p.line_to(x + w, y);
                p.line_to(x + w, y + h);
                p.line_to(x,     y + h);
                p.close_polygon();
                p
            },
            Shape::Circle { cx, cy, r } => ellipse(cx, cy, r, r),
            Shape::Ellipse { cx, cy, rx, ry } => ellipse(cx, cy, rx, ry),
        }
    }
}

impl From<Path> for Shape {
    fn from(p: Path) -> Shape {
        Shape::Path(p)
    }
}

fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64) -> Path {
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;
    let mut p = Path::new();
    p.move_to(cx + rx, cy);
    p.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx,      cy + ry);
    p.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    p.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx,      cy - ry);
    p.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    p.close_polygon();
    p
}
