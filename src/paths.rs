//! Paths, SubPaths and Segments
//!
//! # Example
//!
//!     let mut path = scanfill::Path::new();
//!     path.move_to(0.0, 0.0);
//!     path.line_to(10.0, 0.0);
//!     path.quad_to(15.0, 5.0, 10.0, 10.0);
//!     path.close_polygon();
//!
//!     assert_eq!(path.subpaths().len(), 1);
//!     assert!(path.subpaths()[0].is_closed());
//!

use crate::clip::Rectangle;

use std::ops::Add;
use std::ops::Sub;
use std::ops::Mul;

/// Location in user space
#[derive(Debug,Default,Copy,Clone,PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    /// Both coordinates are neither NaN nor infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
    /// Distance between two points
    pub fn distance(&self, other: &Point) -> f64 {
        len(self, other)
    }
    /// Point a fraction `t` of the way to `other`
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t,
                   self.y + (other.y - self.y) * t)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Length between two points
///
/// Finite for any finite points less than f64::MAX apart
pub fn len(a: &Point, b: &Point) -> f64 {
    (a.x-b.x).hypot(a.y-b.y)
}

/// Cross product of (p2-p1) and (p-p2)
///
/// Sign gives the side of the line p1 -> p2 the point p lies on
pub fn cross(p1: &Point, p2: &Point, p: &Point) -> f64 {
    (p.x - p2.x) * (p2.y - p1.y) - (p.y - p2.y) * (p2.x - p1.x)
}

/// Path Segment
///
/// The start point of a segment is the end point of the previous segment
/// (or the start of its SubPath), so consecutive segments always connect.
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum Segment {
    /// Straight line to a point
    Line(Point),
    /// Quadratic Bezier with a control point and an end point
    Quad(Point, Point),
    /// Cubic Bezier with two control points and an end point
    Cubic(Point, Point, Point),
}

impl Segment {
    /// Final point of the segment
    pub fn end(&self) -> Point {
        match *self {
            Segment::Line(p) => p,
            Segment::Quad(_, p) => p,
            Segment::Cubic(_, _, p) => p,
        }
    }
    /// Apply `f` to every point of the segment
    pub fn map<F>(&self, f: F) -> Segment where F: Fn(Point) -> Point {
        match *self {
            Segment::Line(p) => Segment::Line(f(p)),
            Segment::Quad(c, p) => Segment::Quad(f(c), f(p)),
            Segment::Cubic(c1, c2, p) => Segment::Cubic(f(c1), f(c2), f(p)),
        }
    }
    fn points(&self) -> Vec<Point> {
        match *self {
            Segment::Line(p) => vec![p],
            Segment::Quad(c, p) => vec![c, p],
            Segment::Cubic(c1, c2, p) => vec![c1, c2, p],
        }
    }
}

/// Orientation of a closed polygon
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum PathOrientation {
    Clockwise,
    CounterClockwise
}

/// Continuous sequence of segments, open or closed
#[derive(Debug,Clone,PartialEq)]
pub struct SubPath {
    /// First point
    pub start: Point,
    /// Segments in drawing order
    pub segments: Vec<Segment>,
    /// Closed back to `start`
    pub closed: bool,
}

impl SubPath {
    /// Create an empty, open SubPath beginning at `start`
    pub fn new(start: Point) -> Self {
        Self { start, segments: vec![], closed: false }
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    /// SubPath has nothing to draw: no segments and not closed
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && ! self.closed
    }
    /// Last point of the last segment
    pub fn end(&self) -> Point {
        self.segments.last().map(|s| s.end()).unwrap_or(self.start)
    }
    /// All points, including control points, are finite
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() &&
            self.segments.iter().all(|s| s.points().iter().all(|p| p.is_finite()))
    }
    /// Apply `f` to every point, including control points
    pub fn map<F>(&self, f: F) -> SubPath where F: Fn(Point) -> Point {
        SubPath {
            start: f(self.start),
            segments: self.segments.iter().map(|s| s.map(&f)).collect(),
            closed: self.closed,
        }
    }
    /// Same SubPath traversed in the opposite direction
    pub fn reversed(&self) -> SubPath {
        let mut starts = vec![self.start];
        starts.extend(self.segments.iter().map(|s| s.end()));
        let mut out = SubPath::new(self.end());
        for (i, seg) in self.segments.iter().enumerate().rev() {
            let to = starts[i];
            out.segments.push(match *seg {
                Segment::Line(_) => Segment::Line(to),
                Segment::Quad(c, _) => Segment::Quad(c, to),
                Segment::Cubic(c1, c2, _) => Segment::Cubic(c2, c1, to),
            });
        }
        out.closed = self.closed;
        out
    }
    /// Bounding box of all points, including control points
    pub fn bounding_rect(&self) -> Rectangle<f64> {
        let mut r = Rectangle::new(self.start.x, self.start.y,
                                   self.start.x, self.start.y);
        for s in &self.segments {
            for p in s.points() {
                r.expand(p.x, p.y);
            }
        }
        r
    }
}

/// Vertex command
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum PathCommand {
    MoveTo,
    LineTo,
    /// Quadratic control or end point
    Curve3,
    /// Cubic control or end point
    Curve4,
    /// Close the current SubPath; the vertex repeats its start
    Close,
}

/// Point with a command
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub cmd: PathCommand,
}

impl Vertex {
    pub fn new(x: f64, y: f64, cmd: PathCommand) -> Self {
        Self { x, y, cmd }
    }
}

/// Ordered collection of SubPaths
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    /// Create an empty Path
    pub fn new() -> Self {
        Self { subpaths: vec![] }
    }
    /// SubPaths in drawing order
    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }
    /// Path contains no SubPaths
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }
    /// Remove all SubPaths
    pub fn remove_all(&mut self) {
        self.subpaths.clear();
    }
    /// Begin a new SubPath at (x,y)
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push( SubPath::new(Point::new(x,y)) );
    }
    /// Straight line from the current point to (x,y)
    ///
    /// Without a current point this acts as a `move_to`
    pub fn line_to(&mut self, x: f64, y: f64) {
        if let Some(sub) = self.current(x, y) {
            sub.segments.push( Segment::Line(Point::new(x,y)) );
        }
    }
    /// Quadratic Bezier from the current point through control (cx,cy) to (x,y)
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        if let Some(sub) = self.current(x, y) {
            sub.segments.push( Segment::Quad(Point::new(cx,cy), Point::new(x,y)) );
        }
    }
    /// Cubic Bezier from the current point through controls to (x,y)
    pub fn cubic_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) {
        if let Some(sub) = self.current(x, y) {
            sub.segments.push( Segment::Cubic(Point::new(cx1,cy1),
                                              Point::new(cx2,cy2),
                                              Point::new(x,y)) );
        }
    }
    /// Close the current SubPath
    ///
    /// Drawing after a close continues from the start of the closed SubPath
    pub fn close_polygon(&mut self) {
        if let Some(sub) = self.subpaths.last_mut() {
            sub.closed = true;
        }
    }
    /// Append a SubPath
    pub fn push(&mut self, sub: SubPath) {
        self.subpaths.push(sub);
    }
    /// Same Path with every SubPath traversed in the opposite direction
    pub fn reversed(&self) -> Path {
        Path { subpaths: self.subpaths.iter().map(|s| s.reversed()).collect() }
    }
    /// Flat vertex and command view of the Path
    ///
    ///     use scanfill::{Path, PathCommand};
    ///
    ///     let mut path = Path::new();
    ///     path.move_to(0.0, 0.0);
    ///     path.quad_to(5.0, 5.0, 10.0, 0.0);
    ///     path.close_polygon();
    ///     let cmds : Vec<_> = path.vertices().iter().map(|v| v.cmd).collect();
    ///     assert_eq!(cmds, vec![PathCommand::MoveTo,
    ///                           PathCommand::Curve3, PathCommand::Curve3,
    ///                           PathCommand::Close]);
    ///
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = vec![];
        for sub in &self.subpaths {
            out.push(Vertex::new(sub.start.x, sub.start.y, PathCommand::MoveTo));
            for seg in &sub.segments {
                let cmd = match seg {
                    Segment::Line(_) => PathCommand::LineTo,
                    Segment::Quad(..) => PathCommand::Curve3,
                    Segment::Cubic(..) => PathCommand::Curve4,
                };
                out.extend(seg.points().into_iter().map(|p| Vertex::new(p.x, p.y, cmd)));
            }
            if sub.closed {
                out.push(Vertex::new(sub.start.x, sub.start.y, PathCommand::Close));
            }
        }
        out
    }
    /// Bounding box of all points, including control points
    pub fn bounding_rect(&self) -> Option<Rectangle<f64>> {
        let mut iter = self.subpaths.iter();
        let mut r = iter.next()?.bounding_rect();
        for s in iter {
            r.expand_rect(&s.bounding_rect());
        }
        Some(r)
    }
    /// SubPath receiving the next segment; starts a new one when required
    ///
    /// Returns None only if a SubPath was started at (x,y), where the new
    /// segment would be empty
    fn current(&mut self, x: f64, y: f64) -> Option<&mut SubPath> {
        match self.subpaths.last() {
            None => {
                self.move_to(x, y);
                return None;
            },
            Some(s) if s.closed => {
                let p = s.start;
                self.move_to(p.x, p.y);
            },
            Some(_) => {},
        }
        self.subpaths.last_mut()
    }
}

impl From<SubPath> for Path {
    fn from(sub: SubPath) -> Path {
        Path { subpaths: vec![sub] }
    }
}

/// Signed area of a closed polygon
///
/// Positive for counter-clockwise in y-up coordinates
pub fn polygon_area(pts: &[Point]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0 .. n {
        let p1 = pts[i];
        let p2 = pts[(i+1) % n];
        area += p1.x * p2.y - p1.y * p2.x;
    }
    area / 2.0
}

/// Orientation of a closed polygon
pub fn polygon_orientation(pts: &[Point]) -> PathOrientation {
    if polygon_area(pts) < 0.0 {
        PathOrientation::Clockwise
    } else {
        PathOrientation::CounterClockwise
    }
}
