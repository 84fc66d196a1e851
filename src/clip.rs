//! Clipping Region
//!
//! Every line headed for a rasterizer passes through [Clip] first. Lines
//! entirely above or below the clip box are dropped, lines to its left or
//! right are collapsed onto the box edge so their winding is retained. The
//! result has every vertex inside the box, whatever the magnitude of the
//! input, and is exactly what the fill rule would have produced for the
//! visible region.
//!
//!     use scanfill::{Point, Rectangle, clip_polygon};
//!
//!     let tri = [Point::new(500.0, 500.0),
//!                Point::new(-1e9, -1e9),
//!                Point::new(1e9, -1e9)];
//!     let clip = Rectangle::new(-1.0, -1.0, 1001.0, 1001.0);
//!     let out = clip_polygon(&tri, &clip);
//!     assert!(out.iter().all(|p| p.x >= -1.0 && p.x <= 1001.0));
//!     assert!(out.iter().all(|p| p.y >= -1.0 && p.y <= 1001.0));
//!
//! [Clip]: struct.Clip.html

use crate::paths::Point;
use crate::LineSink;

use log::trace;

/// Rectangle
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Rectangle<T: std::cmp::PartialOrd + Copy> {
    /// Minimum x value
    pub x1: T,
    /// Minimum y value
    pub y1: T,
    /// Maximum x value
    pub x2: T,
    /// Maximum y value
    pub y2: T,
}
impl<T> Rectangle<T> where T: std::cmp::PartialOrd + Copy {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        let (x1, x2) = if x1 > x2 { (x2,x1) } else { (x1,x2) };
        let (y1, y2) = if y1 > y2 { (y2,y1) } else { (y1,y2) };
        Self { x1,y1,x2,y2 }
    }
    /// Get location of point relative to rectangle
    ///
    /// Returned is an a u8 made up of the following bits:
    /// - [INSIDE](constant.INSIDE.html)
    /// - [LEFT](constant.LEFT.html)
    /// - [RIGHT](constant.RIGHT.html)
    /// - [BOTTOM](constant.BOTTOM.html)
    /// - [TOP](constant.TOP.html)
    ///
    pub fn clip_flags(&self, x: T, y: T) -> u8 {
        clip_flags(&x,&y, &self.x1, &self.y1, &self.x2, &self.y2)
    }
    /// Expand if the point (x,y) is outside
    pub fn expand(&mut self, x: T, y: T) {
        if x < self.x1 { self.x1 = x; }
        if x > self.x2 { self.x2 = x; }
        if y < self.y1 { self.y1 = y; }
        if y > self.y2 { self.y2 = y; }
    }
    /// Expand if the rectangle is outside
    pub fn expand_rect(&mut self, r: &Rectangle<T>) {
        self.expand(r.x1, r.y1);
        self.expand(r.x2, r.y2);
    }
    /// Point (x,y) lies inside or on the boundary
    pub fn contains(&self, x: T, y: T) -> bool {
        self.clip_flags(x, y) == INSIDE
    }
    /// Rectangles overlap or touch
    pub fn intersects(&self, r: &Rectangle<T>) -> bool {
        ! (r.x2 < self.x1 || r.x1 > self.x2 || r.y2 < self.y1 || r.y1 > self.y2)
    }
}

impl Rectangle<f64> {
    /// Rectangle grown by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.x1 - margin, self.y1 - margin,
                  self.x2 + margin, self.y2 + margin)
    }
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// Inside Region
///
/// See https://en.wikipedia.org/wiki/Liang-Barsky_algorithm
/// See https://en.wikipedia.org/wiki/Cyrus-Beck_algorithm
pub const INSIDE : u8 = 0b0000;
/// Left of Region
pub const LEFT   : u8 = 0b0000_0001;
/// Right of Region
pub const RIGHT  : u8 = 0b0000_0010;
/// Below Region (smaller y)
pub const BOTTOM : u8 = 0b0000_0100;
/// Above Region (larger y)
pub const TOP    : u8 = 0b0000_1000;

/// Determine the location of a point to a broken-down rectangle or range
///
/// Returned is an a u8 made up of the following bits:
/// - [INSIDE](constant.INSIDE.html)
/// - [LEFT](constant.LEFT.html)
/// - [RIGHT](constant.RIGHT.html)
/// - [BOTTOM](constant.BOTTOM.html)
/// - [TOP](constant.TOP.html)
///
fn clip_flags<T: std::cmp::PartialOrd>(x: &T, y: &T, x1: &T, y1: &T, x2: &T, y2: &T) -> u8 {
    let mut code = INSIDE;
    if x < x1 { code |= LEFT; }
    if x > x2 { code |= RIGHT; }
    if y < y1 { code |= BOTTOM; }
    if y > y2 { code |= TOP; }
    code
}

/// Portion of the segment a -> b inside the rectangle (Liang-Barsky)
///
/// Returns the entry and exit points followed by their parameters, or
/// None if the segment misses the rectangle. An end point on the boundary
/// takes the boundary value exactly; its other coordinate comes from
/// [cross_at], so it stays accurate however far `a` and
/// `b` are from the rectangle.
///
///     use scanfill::{Point, Rectangle, clip_segment};
///
///     let r = Rectangle::new(0.0, 0.0, 100.0, 10.0);
///     let (p0, p1, _, t1) = clip_segment(&Point::new(-4e17, 5.0),
///                                        &Point::new(50.0, 5.0), &r).unwrap();
///     assert_eq!(p0, Point::new(0.0, 5.0));
///     assert_eq!(p1, Point::new(50.0, 5.0));
///     assert_eq!(t1, 1.0);
///
/// [cross_at]: fn.cross_at.html
pub fn clip_segment(a: &Point, b: &Point, r: &Rectangle<f64>) -> Option<(Point, Point, f64, f64)> {
    let ((t0, e0), (t1, e1)) = liang_barsky(a, b, r)?;
    let p0 = boundary_point(a, b, e0, r).unwrap_or(*a);
    let p1 = boundary_point(a, b, e1, r).unwrap_or(*b);
    Some((p0, p1, t0, t1))
}

/// Point where a -> b crosses rectangle edge `edge`, clamped to the rectangle
///
/// Edges are numbered left, right, bottom, top
fn boundary_point(a: &Point, b: &Point, edge: Option<usize>, r: &Rectangle<f64>) -> Option<Point> {
    let p = match edge? {
        0 => Point::new(r.x1, cross_at(r.x1, a.x, a.y, b.x, b.y)),
        1 => Point::new(r.x2, cross_at(r.x2, a.x, a.y, b.x, b.y)),
        2 => Point::new(cross_at(r.y1, a.y, a.x, b.y, b.x), r.y1),
        _ => Point::new(cross_at(r.y2, a.y, a.x, b.y, b.x), r.y2),
    };
    Some(Point::new(p.x.max(r.x1).min(r.x2), p.y.max(r.y1).min(r.y2)))
}

/// Segment parameter and the rectangle edge it lies on, None for an end point
type Bound = (f64, Option<usize>);

/// Liang-Barsky, keeping the edge that set each parameter
fn liang_barsky(a: &Point, b: &Point, r: &Rectangle<f64>) -> Option<(Bound, Bound)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 : Bound = (0.0, None);
    let mut t1 : Bound = (1.0, None);
    let checks = [(-dx, a.x - r.x1),
                  ( dx, r.x2 - a.x),
                  (-dy, a.y - r.y1),
                  ( dy, r.y2 - a.y)];
    for (edge, &(p, q)) in checks.iter().enumerate() {
        if p == 0.0 {
            // Parallel to this edge
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                if t > t1.0 { return None; }
                if t > t0.0 { t0 = (t, Some(edge)); }
            } else {
                if t < t0.0 { return None; }
                if t < t1.0 { t1 = (t, Some(edge)); }
            }
        }
    }
    Some((t0, t1))
}

/// Clip Region
///
/// Clipping for Rasterizers
#[derive(Debug,Default)]
pub struct Clip {
    /// Current x Point
    x1: f64,
    /// Current y Point
    y1: f64,
    /// Rectangle to clip on
    clip_box: Option<Rectangle<f64>>,
    /// Current clip flag for point (x1,y1)
    clip_flag: u8,
}

/// Exact difference `a - b` as a rounded value and its rounding error
fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let s = a - b;
    let bb = s - a;
    (s, (a - (s - bb)) - (b + bb))
}

/// Coordinate `b` on the line (a1,b1) -> (a2,b2) where coordinate `a` is `v`
///
/// Requires `a1 != a2`. The offset is taken from the end point nearer to
/// `v` and kept with its rounding error, so the crossing stays finite and
/// accurate for end points up to the limits of f64. The result lies
/// between `b1` and `b2`.
pub fn cross_at(v: f64, a1: f64, b1: f64, a2: f64, b2: f64) -> f64 {
    let slope = (b2 * 0.5 - b1 * 0.5) / (a2 * 0.5 - a1 * 0.5);
    let (a0, b0) = if (v - a1).abs() <= (v - a2).abs() { (a1, b1) } else { (a2, b2) };
    let (hi, lo) = two_diff(v, a0);
    let b = hi.mul_add(slope, b0) + lo * slope;
    b.max(b1.min(b2)).min(b1.max(b2))
}

impl Clip {
    /// Create new Clipping region
    pub fn new() -> Self {
        Self {x1: 0.0, y1: 0.0,
              clip_box: None,
              clip_flag: INSIDE }
    }
    /// Create new Clipping region on a Rectangle
    pub fn with_box(r: Rectangle<f64>) -> Self {
        let mut clip = Self::new();
        clip.clip_box(r);
        clip
    }
    /// Clip a line along the top and bottom of the region
    fn line_clip_y<S: LineSink>(&self, ras: &mut S,
                                x1: f64, y1: f64,
                                x2: f64, y2: f64,
                                f1: u8, f2: u8) {
        let b = match self.clip_box {
            None => return,
            Some(ref b) => b,
        };
        let f1 = f1 & (TOP|BOTTOM);
        let f2 = f2 & (TOP|BOTTOM);
        // Fully Visible in y
        if f1 == INSIDE && f2 == INSIDE {
            ras.line(Point::new(x1,y1), Point::new(x2,y2));
            return;
        }
        // Both points above or below clip box
        if f1 == f2 {
            return;
        }
        let (mut tx1, mut ty1, mut tx2, mut ty2) = (x1,y1,x2,y2);
        if f1 == BOTTOM {
            tx1 = cross_at(b.y1, y1, x1, y2, x2);
            ty1 = b.y1;
        }
        if f1 == TOP {
            tx1 = cross_at(b.y2, y1, x1, y2, x2);
            ty1 = b.y2;
        }
        if f2 == BOTTOM {
            tx2 = cross_at(b.y1, y1, x1, y2, x2);
            ty2 = b.y1;
        }
        if f2 == TOP {
            tx2 = cross_at(b.y2, y1, x1, y2, x2);
            ty2 = b.y2;
        }
        ras.line(Point::new(tx1,ty1), Point::new(tx2,ty2));
    }

    /// Draw a line from the current point to (x2,y2) into a LineSink
    ///
    /// Final point (x2,y2) is saved internally as (x1,y1)
    pub fn line_to<S: LineSink>(&mut self, ras: &mut S, x2: f64, y2: f64) {
        if let Some(b) = self.clip_box {
            let f2 = b.clip_flags(x2,y2);
            // Both points above or below clip box
            let fy1 = (TOP | BOTTOM) & self.clip_flag;
            let fy2 = (TOP | BOTTOM) & f2;
            if fy1 != INSIDE && fy1 == fy2 {
                trace!("LINE OUTSIDE CLIP BOX ({} {}) -> ({} {})", self.x1, self.y1, x2, y2);
                self.x1 = x2;
                self.y1 = y2;
                self.clip_flag = f2;
                return;
            }
            let (x1,y1,f1) = (self.x1, self.y1, self.clip_flag);
            match (f1 & (LEFT|RIGHT), f2 & (LEFT|RIGHT)) {
                (INSIDE,INSIDE) => self.line_clip_y(ras, x1,y1,x2,y2,f1,f2),
                (INSIDE,RIGHT) => {
                    let y3 = cross_at(b.x2, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, x1,   y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x2, y2, f3, f2);
                },
                (RIGHT,INSIDE) => {
                    let y3 = cross_at(b.x2, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x2, y3);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3,   x2, y2, f3, f2);
                },
                (INSIDE,LEFT) => {
                    let y3 = cross_at(b.x1, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, x1,   y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x1, y2, f3, f2);
                },
                (RIGHT,LEFT) => {
                    let y3 = cross_at(b.x2, x1, y1, x2, y2);
                    let y4 = cross_at(b.x1, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x2, y3);
                    let f4 = b.clip_flags(b.x1, y4);
                    self.line_clip_y(ras, b.x2, y1, b.x2, y3, f1, f3);
                    self.line_clip_y(ras, b.x2, y3, b.x1, y4, f3, f4);
                    self.line_clip_y(ras, b.x1, y4, b.x1, y2, f4, f2);
                },
                (LEFT,INSIDE) => {
                    let y3 = cross_at(b.x1, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x1, y3);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3,   x2, y2, f3, f2);
                },
                (LEFT,RIGHT) => {
                    let y3 = cross_at(b.x1, x1, y1, x2, y2);
                    let y4 = cross_at(b.x2, x1, y1, x2, y2);
                    let f3 = b.clip_flags(b.x1, y3);
                    let f4 = b.clip_flags(b.x2, y4);
                    self.line_clip_y(ras, b.x1, y1, b.x1, y3, f1, f3);
                    self.line_clip_y(ras, b.x1, y3, b.x2, y4, f3, f4);
                    self.line_clip_y(ras, b.x2, y4, b.x2, y2, f4, f2);
                },
                (LEFT,LEFT)   => self.line_clip_y(ras, b.x1,y1,b.x1,y2,f1,f2),
                (RIGHT,RIGHT) => self.line_clip_y(ras, b.x2,y1,b.x2,y2,f1,f2),

                (_,_) => unreachable!("f1,f2 {:?} {:?}", f1,f2),
            }
            self.clip_flag = f2;
        } else {
            ras.line(Point::new(self.x1, self.y1), Point::new(x2, y2));
        }
        self.x1 = x2;
        self.y1 = y2;
    }
    /// Move to point (x2,y2)
    ///
    /// Point is saved internally as (x1,y1)
    pub fn move_to(&mut self, x2: f64, y2: f64) {
        self.x1 = x2;
        self.y1 = y2;
        if let Some(ref b) = self.clip_box {
            self.clip_flag = b.clip_flags(x2, y2);
        }
    }
    /// Define the clipping region
    pub fn clip_box(&mut self, r: Rectangle<f64>) {
        self.clip_box = Some( r );
    }
    /// Current clipping region
    pub fn bounds(&self) -> Option<Rectangle<f64>> {
        self.clip_box
    }
}

/// Collects clipped lines as a chain of vertices
impl LineSink for Vec<Point> {
    fn line(&mut self, a: Point, b: Point) {
        if self.last() != Some(&a) {
            self.push(a);
        }
        if self.last() != Some(&b) {
            self.push(b);
        }
    }
}

/// Clip a closed polygon to a rectangle
///
/// The returned polygon has every vertex inside `r` and covers the same
/// pixels inside `r` as the input under either fill rule. Edges joining
/// dropped portions run along the top or bottom of `r` and are horizontal.
pub fn clip_polygon(pts: &[Point], r: &Rectangle<f64>) -> Vec<Point> {
    let mut out = vec![];
    let (first, rest) = match pts.split_first() {
        Some(v) => v,
        None => return out,
    };
    let mut clip = Clip::with_box(*r);
    clip.move_to(first.x, first.y);
    for p in rest {
        clip.line_to(&mut out, p.x, p.y);
    }
    clip.line_to(&mut out, first.x, first.y);
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}
