//! Curve Flattening
//!
//! Quadratic and cubic Bezier segments are approximated by lines using
//! de Casteljau subdivision. A curve is accepted once every control point
//! lies within the tolerance of its chord; the curve stays inside the convex
//! hull of its control points, so the chord is then within the tolerance of
//! the curve.
//!
//!     use scanfill::{Flattener, Path};
//!
//!     let mut path = Path::new();
//!     path.move_to(0.0, 0.0);
//!     path.cubic_to(0.0, 100.0, 100.0, 100.0, 100.0, 0.0);
//!
//!     let pts : Vec<_> = Flattener::new(0.25).flatten(&path.subpaths()[0]).collect();
//!     assert!(pts.len() > 2);
//!     assert_eq!(pts[0], scanfill::Point::new(0.0, 0.0));
//!     assert_eq!(pts[pts.len()-1], scanfill::Point::new(100.0, 0.0));
//!

use crate::paths::Point;
use crate::paths::Segment;
use crate::paths::SubPath;
use crate::paths::Path;
use crate::clip::Rectangle;

use log::debug;

/// Default flatness tolerance, in pixels
pub const DEFAULT_TOLERANCE : f64 = 0.25;
/// Maximum subdivision depth of a single curve
pub const MAX_DEPTH : u32 = 16;

/// Polyline, the flattened form of a SubPath
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }
    /// Remove repeated vertices
    ///
    /// Repeated vertices are defined with a distance < 1e-6. For closed
    /// polylines trailing vertices equal to the first are removed as well.
    pub fn clean(&self) -> Polyline {
        let mut out : Vec<Point> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            match out.last() {
                Some(q) if q.distance(p) < 1e-6 => {},
                _ => out.push(*p),
            }
        }
        if self.closed {
            while out.len() > 1 && out[0].distance(&out[out.len()-1]) < 1e-6 {
                out.pop();
            }
        }
        Polyline::new(out, self.closed)
    }
}

#[derive(Debug,Copy,Clone)]
enum Curve {
    Quad([Point;3]),
    Cubic([Point;4]),
}

impl Curve {
    fn end(&self) -> Point {
        match *self {
            Curve::Quad(p) => p[2],
            Curve::Cubic(p) => p[3],
        }
    }
    fn is_finite(&self) -> bool {
        match *self {
            Curve::Quad(ref p) => p.iter().all(Point::is_finite),
            Curve::Cubic(ref p) => p.iter().all(Point::is_finite),
        }
    }
    fn bounding_rect(&self) -> Rectangle<f64> {
        let pts : &[Point] = match *self {
            Curve::Quad(ref p) => p,
            Curve::Cubic(ref p) => p,
        };
        let mut r = Rectangle::new(pts[0].x, pts[0].y, pts[0].x, pts[0].y);
        for p in &pts[1..] {
            r.expand(p.x, p.y);
        }
        r
    }
    /// Control points all lie within `tol` of the chord
    fn is_flat(&self, tol: f64) -> bool {
        match *self {
            Curve::Quad(p) => dist_to_segment(&p[1], &p[0], &p[2]) <= tol,
            Curve::Cubic(p) => dist_to_segment(&p[1], &p[0], &p[3]) <= tol &&
                               dist_to_segment(&p[2], &p[0], &p[3]) <= tol,
        }
    }
    /// Split in half, de Casteljau
    fn split(&self) -> (Curve, Curve) {
        match *self {
            Curve::Quad(p) => {
                let p01 = p[0].lerp(&p[1], 0.5);
                let p12 = p[1].lerp(&p[2], 0.5);
                let m = p01.lerp(&p12, 0.5);
                (Curve::Quad([p[0], p01, m]), Curve::Quad([m, p12, p[2]]))
            },
            Curve::Cubic(p) => {
                let p01 = p[0].lerp(&p[1], 0.5);
                let p12 = p[1].lerp(&p[2], 0.5);
                let p23 = p[2].lerp(&p[3], 0.5);
                let p012 = p01.lerp(&p12, 0.5);
                let p123 = p12.lerp(&p23, 0.5);
                let m = p012.lerp(&p123, 0.5);
                (Curve::Cubic([p[0], p01, p012, m]), Curve::Cubic([m, p123, p23, p[3]]))
            },
        }
    }
}

/// Distance from point p to the segment a -> b
pub fn dist_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx*dx + dy*dy;
    if d2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p.x - a.x) * dx + (p.y - a.y) * dy) / d2;
    let t = t.max(0.0).min(1.0);
    p.distance(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// Curve Flattener
#[derive(Debug,Copy,Clone)]
pub struct Flattener {
    /// Maximum distance between curve and polyline
    tolerance: f64,
    /// Maximum subdivision depth
    max_depth: u32,
    /// Curves outside this region are replaced by their chord
    cull: Option<Rectangle<f64>>,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl Flattener {
    /// Create a new Flattener with a tolerance in pixels
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance, max_depth: MAX_DEPTH, cull: None }
    }
    /// Flatness tolerance
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
    /// Set the maximum subdivision depth
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }
    /// Replace curves whose control points all lie outside `r` by their chord
    ///
    /// The region between such a curve and its chord is outside `r`, so
    /// nothing drawn inside `r` changes.
    pub fn cull(mut self, r: Rectangle<f64>) -> Self {
        self.cull = Some(r);
        self
    }
    /// Lazily flatten a SubPath
    ///
    /// The first point is the start of the SubPath, followed by the end of
    /// every line and the approximation of every curve.
    pub fn flatten<'a>(&self, sub: &'a SubPath) -> Flatten<'a> {
        Flatten {
            flattener: *self,
            segments: sub.segments.iter(),
            current: sub.start,
            start: Some(sub.start),
            stack: vec![],
            capped: 0,
        }
    }
    /// Flatten a SubPath into a Polyline
    pub fn flatten_subpath(&self, sub: &SubPath) -> Polyline {
        Polyline::new(self.flatten(sub).collect(), sub.closed)
    }
    /// Flatten every non-empty SubPath of a Path
    pub fn flatten_path(&self, path: &Path) -> Vec<Polyline> {
        path.subpaths().iter()
            .filter(|s| ! s.is_empty())
            .map(|s| self.flatten_subpath(s))
            .collect()
    }
}

/// Iterator over the flattened points of a SubPath
#[derive(Debug)]
pub struct Flatten<'a> {
    flattener: Flattener,
    segments: std::slice::Iter<'a, Segment>,
    current: Point,
    start: Option<Point>,
    /// Pending curves with their depth, next one last
    stack: Vec<(Curve, u32)>,
    /// Curves that hit the depth limit before becoming flat
    capped: usize,
}

impl<'a> Flatten<'a> {
    fn accept(&mut self, curve: &Curve, depth: u32) -> bool {
        if ! curve.is_finite() {
            return true;
        }
        if let Some(ref r) = self.flattener.cull {
            if ! r.intersects(&curve.bounding_rect()) {
                return true;
            }
        }
        if curve.is_flat(self.flattener.tolerance) {
            return true;
        }
        if depth >= self.flattener.max_depth {
            self.capped += 1;
            return true;
        }
        false
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = Point;
    fn next(&mut self) -> Option<Point> {
        if let Some(p) = self.start.take() {
            return Some(p);
        }
        loop {
            if let Some((curve, depth)) = self.stack.pop() {
                if self.accept(&curve, depth) {
                    return Some(curve.end());
                }
                let (a, b) = curve.split();
                self.stack.push((b, depth + 1));
                self.stack.push((a, depth + 1));
                continue;
            }
            let seg = match self.segments.next() {
                Some(seg) => seg,
                None => {
                    if self.capped > 0 {
                        debug!("FLATTEN: {} curves reached depth limit {}",
                               self.capped, self.flattener.max_depth);
                        self.capped = 0;
                    }
                    return None;
                }
            };
            let p0 = self.current;
            self.current = seg.end();
            match *seg {
                Segment::Line(p) => return Some(p),
                Segment::Quad(c, p) => self.stack.push((Curve::Quad([p0, c, p]), 0)),
                Segment::Cubic(c1, c2, p) => self.stack.push((Curve::Cubic([p0, c1, c2, p]), 0)),
            }
        }
    }
}
