//! Path Stroking
//!
//! # Example
//!
//!     use scanfill::{Point, Polyline, StrokeStyle, Stroker, LineCap, LineJoin};
//!
//!     // Input Polyline
//!     let line = Polyline::new(vec![Point::new(  0.0,   0.0),
//!                                   Point::new(100.0, 100.0),
//!                                   Point::new(200.0,  50.0)], false);
//!
//!     // Stroke
//!     let mut style = StrokeStyle::new(2.5);
//!     style.line_cap(LineCap::Square);
//!     style.line_join(LineJoin::Miter);
//!     style.miter_limit(5.0);
//!
//!     let stroker = Stroker::new(&style, 0.25).unwrap();
//!     let polygons = stroker.outline(&line, None);
//!     assert_eq!(polygons.len(), 1);
//!

use crate::paths::Point;
use crate::paths::len;
use crate::paths::cross;
use crate::flatten::Polyline;
use crate::clip::Rectangle;
use crate::dash::Dash;
use crate::error::Error;
use crate::error::Result;

use std::f64::consts::PI;
use std::f64::consts::SQRT_2;
use std::str::FromStr;

use log::trace;

/// Line End or Cap Style
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum LineCap {
    Butt, Square, Round
}
/// Lines Join Style on the outside
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum LineJoin {
    Miter, Round, Bevel,
}
/// Lines Join Style on the inside
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum InnerJoin {
    Bevel, Miter, Jag, Round
}

impl Default for LineCap   { fn default() -> LineCap   { LineCap::Square  } }
impl Default for LineJoin  { fn default() -> LineJoin  { LineJoin::Miter  } }
impl Default for InnerJoin { fn default() -> InnerJoin { InnerJoin::Miter } }

impl FromStr for LineCap {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "butt" => Ok(LineCap::Butt),
            "square" => Ok(LineCap::Square),
            "round" => Ok(LineCap::Round),
            _ => Err(Error::UnsupportedCap(s.to_string())),
        }
    }
}
impl FromStr for LineJoin {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "miter" => Ok(LineJoin::Miter),
            "round" => Ok(LineJoin::Round),
            "bevel" => Ok(LineJoin::Bevel),
            _ => Err(Error::UnsupportedJoin(s.to_string())),
        }
    }
}

/// Stroke Parameters
///
/// Defaults are a width of 1, square caps, miter joins with a limit of 10
/// and no dashes
#[derive(Debug,Clone,PartialEq)]
pub struct StrokeStyle {
    /// Full width of the line in pixels
    width: f64,
    /// Line Cap Style
    line_cap: LineCap,
    /// Line Join Style
    line_join: LineJoin,
    /// Line Join Style, Inner Angle
    inner_join: InnerJoin,
    /// Maximum ratio of miter length to line width
    miter_limit: f64,
    /// Maximum Length of the inner miter at segment intersections, 1.01
    inner_miter_limit: f64,
    /// Approximation scale, 1.0
    approx_scale: f64,
    /// Dash lengths, empty for a solid line
    dash: Vec<f64>,
    /// Offset into the dash pattern
    dash_phase: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            inner_join: InnerJoin::default(),
            miter_limit: 10.0,
            inner_miter_limit: 1.01,
            approx_scale: 1.0,
            dash: vec![],
            dash_phase: 0.0,
        }
    }
}

impl StrokeStyle {
    /// Create a new StrokeStyle with a width
    pub fn new(width: f64) -> Self {
        Self { width, .. Default::default() }
    }
    /// Set the Stroke Width
    pub fn width(&mut self, width: f64) -> &mut Self {
        self.width = width;
        self
    }
    /// Set Line cap style
    ///
    /// Available options are
    ///   - `Butt`
    ///   - `Square`
    ///   - `Round`
    pub fn line_cap(&mut self, line_cap: LineCap) -> &mut Self {
        self.line_cap = line_cap;
        self
    }
    /// Set Line Join style
    ///
    /// Available options are
    ///   - `Miter`
    ///   - `Round`
    ///   - `Bevel`
    pub fn line_join(&mut self, line_join: LineJoin) -> &mut Self {
        self.line_join = line_join;
        self
    }
    /// Set Inner Join style
    ///
    /// Available options are
    ///   - `Bevel`
    ///   - `Miter`
    ///   - `Jag`
    ///   - `Round`
    pub fn inner_join(&mut self, inner_join: InnerJoin) -> &mut Self {
        self.inner_join = inner_join;
        self
    }
    /// Set miter limit
    pub fn miter_limit(&mut self, miter_limit: f64) -> &mut Self {
        self.miter_limit = miter_limit;
        self
    }
    /// Set inner miter limit
    pub fn inner_miter_limit(&mut self, inner_miter_limit: f64) -> &mut Self {
        self.inner_miter_limit = inner_miter_limit;
        self
    }
    /// Set approximation scale
    ///
    /// Round caps and joins are approximated more finely as the scale increases
    pub fn approximation_scale(&mut self, scale: f64) -> &mut Self {
        self.approx_scale = scale;
        self
    }
    /// Set the dash pattern and phase
    ///
    /// An empty pattern draws a solid line
    pub fn dash(&mut self, pattern: &[f64], phase: f64) -> &mut Self {
        self.dash = pattern.to_vec();
        self.dash_phase = phase;
        self
    }
    pub fn get_width(&self) -> f64 {
        self.width
    }
    pub fn get_line_cap(&self) -> LineCap {
        self.line_cap
    }
    pub fn get_line_join(&self) -> LineJoin {
        self.line_join
    }
    pub fn get_miter_limit(&self) -> f64 {
        self.miter_limit
    }
    /// Check the parameters
    ///
    /// Width and approximation scale must be positive, the miter limits at
    /// least 1 and the dash pattern non-negative with a positive sum
    pub fn validate(&self) -> Result<()> {
        if ! (self.width > 0.0) || ! self.width.is_finite() {
            return Err(Error::InvalidWidth(self.width));
        }
        if ! (self.miter_limit >= 1.0) || ! self.miter_limit.is_finite() {
            return Err(Error::InvalidMiterLimit(self.miter_limit));
        }
        if ! (self.inner_miter_limit >= 1.0) || ! self.inner_miter_limit.is_finite() {
            return Err(Error::InvalidMiterLimit(self.inner_miter_limit));
        }
        if ! (self.approx_scale > 0.0) || ! self.approx_scale.is_finite() {
            return Err(Error::InvalidApproximationScale(self.approx_scale));
        }
        Dash::new(&self.dash, self.dash_phase)?;
        Ok(())
    }
    /// Furthest distance the outline may reach from the center line
    ///
    /// Geometry further than this outside the canvas cannot contribute
    /// to the stroke.
    pub fn margin(&self) -> f64 {
        self.width / 2.0 * self.miter_limit.max(SQRT_2) + 1.0
    }
}

/// Converts polylines into stroke outlines
///
/// Each outline is a closed polygon; overlapping parts of an outline are
/// resolved by the nonzero winding rule.
#[derive(Debug,Clone)]
pub struct Stroker {
    /// Half the width of the line
    width: f64,
    /// Minimum Limit to determine if segments are almost co-linear, 0.5/1024
    width_eps: f64,
    miter_limit: f64,
    inner_miter_limit: f64,
    /// Maximum distance between an arc and its approximation
    tolerance: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    inner_join: InnerJoin,
    dash: Dash,
}

macro_rules! prev {
    ($i:expr, $n:expr) => ( ($i + $n - 1) % $n )
}
macro_rules! curr {
    ($i:expr, $n:expr) => ( $i )
}
macro_rules! next {
    ($i:expr, $n:expr) => ( ($i + 1) % $n )
}

impl Stroker {
    /// Create a Stroker from a StrokeStyle
    ///
    /// Arcs of round caps and joins deviate from a true circle by at most
    /// `tolerance` divided by the approximation scale. Fails if the style is
    /// invalid or `tolerance` is not positive and finite.
    pub fn new(style: &StrokeStyle, tolerance: f64) -> Result<Self> {
        style.validate()?;
        if ! (tolerance > 0.0) || ! tolerance.is_finite() {
            return Err(Error::InvalidTolerance(tolerance));
        }
        Ok(Self {
            width: style.width / 2.0,
            width_eps: 0.5 / 1024.0,
            miter_limit: style.miter_limit,
            inner_miter_limit: style.inner_miter_limit,
            tolerance: tolerance / style.approx_scale,
            line_cap: style.line_cap,
            line_join: style.line_join,
            inner_join: style.inner_join,
            dash: Dash::new(&style.dash, style.dash_phase)?,
        })
    }
    /// Angle increment for arcs of radius `width`
    fn arc_step(&self) -> f64 {
        2.0 * (self.width / (self.width + self.tolerance)).acos()
    }
    /// Calculate Line End Cap
    ///
    fn calc_cap(&self, v0: &Point, v1: &Point) -> Vec<Point> {
        let mut out = vec![];
        let dx = v1.x-v0.x;
        let dy = v1.y-v0.y;
        let len = (dx*dx + dy*dy).sqrt();
        let dx1 = self.width * dy / len;
        let dy1 = self.width * dx / len;

        match self.line_cap {
            LineCap::Square => {
                let dx2 = dy1;
                let dy2 = dx1;
                out.push(Point::new(v0.x - dx1 - dx2, v0.y + dy1 - dy2));
                out.push(Point::new(v0.x + dx1 - dx2, v0.y - dy1 - dy2));
            },
            LineCap::Butt => {
                out.push(Point::new(v0.x - dx1, v0.y + dy1));
                out.push(Point::new(v0.x + dx1, v0.y - dy1));
            },
            LineCap::Round => {
                let da = self.arc_step();
                let n = (PI / da).round() as usize;

                let da = PI / (n + 1) as f64;
                out.push(Point::new(v0.x - dx1, v0.y + dy1));
                let mut a1 = dy1.atan2(-dx1);
                a1 += da;
                for _ in 0 .. n {
                    out.push(Point::new(v0.x + a1.cos() * self.width,
                                        v0.y + a1.sin() * self.width));
                    a1 += da;
                }
                out.push(Point::new(v0.x + dx1, v0.y - dy1));
            }
        }
        out
    }

    /// Calculate an Arc around (x,y) from offset (dx1,dy1) to (dx2,dy2)
    fn calc_arc(&self, x: f64, y: f64, dx1: f64, dy1: f64, dx2: f64, dy2: f64) -> Vec<Point> {
        let mut out = vec![];
        // Starting and Ending Angle
        let mut a1 = dy1.atan2(dx1);
        let mut a2 = dy2.atan2(dx2);

        out.push(Point::new(x + dx1, y + dy1));
        // Require a1 < a2
        if a1 > a2 {
            a2 += 2.0 * PI;
        }
        // Number of points in Arc
        let n = ((a2 - a1) / self.arc_step()) as i64;
        // Arc Increment in radians
        let da = (a2 - a1) / (n + 1) as f64;
        // Increment from original angle as a1 is at initial point
        a1 += da;
        for _ in 0 .. n {
            out.push(Point::new(x + a1.cos() * self.width,
                                y + a1.sin() * self.width));
            a1 += da;
        }
        out.push(Point::new(x + dx2, y + dy2));
        out
    }
    /// Calculate a Miter Join
    ///
    /// Joins that reach further than `mlimit` times the half width from p1
    /// fall back to a bevel
    fn calc_miter(&self,
                  p0: &Point, p1: &Point, p2: &Point,
                  dx1: f64, dy1: f64, dx2: f64, dy2: f64,
                  mlimit: f64) -> Vec<Point> {
        let mut out = vec![];
        let lim = self.width * mlimit;
        let mut miter_limit_exceeded = true;
        // Find the Intersection between the two offset lines
        //
        // a--b-p
        // 0   1 c
        // -----  \
        //      \  \
        //       \2 d
        if let Some(pi) = calc_intersection(p0.x + dx1, p0.y - dy1,   // a
                                            p1.x + dx1, p1.y - dy1,   // b
                                            p1.x + dx2, p1.y - dy2,   // c
                                            p2.x + dx2, p2.y - dy2) { // d
            if len(p1, &pi) <= lim {
                out.push(pi);
                miter_limit_exceeded = false;
            }
        } else {
            // Offset lines are parallel; the next segment either continues
            // the previous one or turns straight back. p0 and p2 lie on the
            // same side of the perpendicular through p1 when it turns back.
            let pz = Point::new(p1.x + dx1, p1.y - dy1);
            if (cross(p0, p1, &pz) < 0.0) == (cross(p1, p2, &pz) < 0.0) {
                out.push(pz);
                miter_limit_exceeded = false;
            }
        }
        if miter_limit_exceeded {
            out.push(Point::new(p1.x + dx1, p1.y - dy1));
            out.push(Point::new(p1.x + dx2, p1.y - dy2));
        }
        out
    }
    /// Calculate the Join of Two Line Segments
    ///
    /// [SVG Line Joins](https://www.w3.org/TR/SVG/painting.html#LineJoin)
    ///
    fn calc_join(&self, p0: &Point, p1: &Point, p2: &Point) -> Vec<Point> {
        let mut out = vec![];
        let len1 = len(p1,p0);
        let len2 = len(p2,p1);

        if len1 == 0.0 || len2 == 0.0 {
            trace!("JOIN: repeated point {:?} {:?} {:?}", p0, p1, p2);
            return out;
        }
        // Distance, perpendicular from line
        let dx1 = self.width * (p1.y-p0.y) / len1;
        let dy1 = self.width * (p1.x-p0.x) / len1;
        let dx2 = self.width * (p2.y-p1.y) / len2;
        let dy2 = self.width * (p2.x-p1.x) / len2;
        let cp = cross(p0, p1, p2);

        if cp > 0.0 {
            // Inner Join
            let limit = (len1.min(len2) / self.width).max(self.inner_miter_limit);
            match self.inner_join {
                InnerJoin::Bevel => {
                    out.push(Point::new(p1.x + dx1, p1.y - dy1));
                    out.push(Point::new(p1.x + dx2, p1.y - dy2));
                },
                InnerJoin::Miter => {
                    out.extend(self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2, limit));
                }
                InnerJoin::Jag |
                InnerJoin::Round => {
                    let d = (dx1-dx2).powi(2) + (dy1-dy2).powi(2);
                    if d < len1.powi(2) && d < len2.powi(2) {
                        out.extend(self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2, limit));
                    } else if self.inner_join == InnerJoin::Jag {
                        out.push(Point::new(p1.x + dx1, p1.y - dy1));
                        out.push(*p1);
                        out.push(Point::new(p1.x + dx2, p1.y - dy2));
                    } else {
                        out.push(Point::new(p1.x + dx1, p1.y - dy1));
                        out.push(*p1);
                        out.extend(self.calc_arc(p1.x, p1.y, dx2, -dy2, dx1, -dy1));
                        out.push(*p1);
                        out.push(Point::new(p1.x + dx2, p1.y - dy2));
                    }
                }
            }
        } else {
            // Outer Join
            let dx = (dx1 + dx2) / 2.0;
            let dy = (dy1 + dy2) / 2.0;
            let dbevel = (dx*dx + dy*dy).sqrt();

            if self.line_join != LineJoin::Miter && self.width - dbevel < self.width_eps {
                // Nearly collinear, a bevel or arc would not differ visibly
                // from a single miter point
                match calc_intersection(p0.x + dx1, p0.y - dy1,
                                        p1.x + dx1, p1.y - dy1,
                                        p1.x + dx2, p1.y - dy2,
                                        p2.x + dx2, p2.y - dy2) {
                    Some(pi) => out.push(pi),
                    None => out.push(Point::new(p1.x + dx1, p1.y - dy1)),
                }
                return out;
            }
            match self.line_join {
                LineJoin::Miter =>
                    out.extend(self.calc_miter(p0, p1, p2, dx1, dy1, dx2, dy2,
                                               self.miter_limit)),
                LineJoin::Round =>
                    out.extend(self.calc_arc(p1.x, p1.y, dx1, -dy1, dx2, -dy2)),
                LineJoin::Bevel => {
                    out.push(Point::new(p1.x + dx1, p1.y - dy1));
                    out.push(Point::new(p1.x + dx2, p1.y - dy2));
                },
            }
        }
        out
    }
    /// Outline of a zero-length run
    ///
    /// Round caps draw a disc, square caps an axis-aligned square, butt
    /// caps nothing
    fn calc_dot(&self, p: &Point) -> Vec<Point> {
        let w = self.width;
        match self.line_cap {
            LineCap::Butt => vec![],
            LineCap::Square => vec![Point::new(p.x - w, p.y - w),
                                    Point::new(p.x + w, p.y - w),
                                    Point::new(p.x + w, p.y + w),
                                    Point::new(p.x - w, p.y + w)],
            LineCap::Round => {
                let n = ((2.0 * PI / self.arc_step()).ceil() as usize).max(4);
                let da = 2.0 * PI / n as f64;
                (0 .. n).map(|i| {
                    let a = da * i as f64;
                    Point::new(p.x + a.cos() * w, p.y + a.sin() * w)
                }).collect()
            }
        }
    }
    /// Stroke a single run, without dashing
    ///
    /// Open runs become one polygon running up one side and down the
    /// other. Closed runs become two rings of opposite orientation.
    pub fn stroke_run(&self, run: &Polyline) -> Vec<Vec<Point>> {
        let run = run.clean();
        let v = &run.points;
        let closed = run.closed && v.len() > 2;
        if v.is_empty() {
            return vec![];
        }
        if v.len() == 1 {
            let dot = self.calc_dot(&v[0]);
            return if dot.is_empty() { vec![] } else { vec![dot] };
        }
        let n = v.len();
        let (n1, n2) = if closed { (0, n) } else { (1, n-1) };

        // Forward Path
        let mut outf = vec![];
        if ! closed {
            outf.extend( self.calc_cap(&v[0], &v[1]) );
        }
        for i in n1 .. n2 {
            outf.extend( self.calc_join(&v[prev!(i,n)], &v[curr!(i,n)], &v[next!(i,n)]) );
        }

        // Backward Path
        let mut outb = vec![];
        if ! closed {
            outb.extend( self.calc_cap(&v[n-1], &v[n-2]) );
        }
        for i in (n1 .. n2).rev() {
            outb.extend( self.calc_join(&v[next!(i,n)], &v[curr!(i,n)], &v[prev!(i,n)]) );
        }

        if closed {
            vec![outf, outb]
        } else {
            outf.extend(outb);
            vec![outf]
        }
    }
    /// Stroke a polyline, applying the dash pattern
    ///
    /// With a `clip` rectangle only the parts of the polyline inside it are
    /// stroked; it should extend past the visible region by at least
    /// [StrokeStyle::margin](struct.StrokeStyle.html#method.margin).
    pub fn outline(&self, line: &Polyline, clip: Option<&Rectangle<f64>>) -> Vec<Vec<Point>> {
        self.dash.runs(line, clip).iter()
            .flat_map(|run| self.stroke_run(run))
            .filter(|poly| poly.len() > 2)
            .collect()
    }
}

/// Calculate Intersection of two lines
///
/// Parallel Line are return as `None` otherwise the Intersection
///    (`px`,`py`) is returned
///
/// [Line-Line Intersection at Wikipedia](https://en.wikipedia.org/wiki/Line%E2%80%93line_intersection#Given_two_points_on_each_line)
///
/// Lines are specified to pairs of points
///   - (`ax`, `ay`) -> (`bx`, `by`)
///   - (`cv`, `cy`) -> (`dx`, `dy`)
///
/// The intersection is defined at
///```text
///     px = ax + t (bx-ax)
///     py = ay + y (by-ay)
///```
///   where
///```text
///          (ay-cy)(dx-cx) - (ax-cx)(dy-cy)
///     t = ----------------------------------
///          (bx-ax)(dy-cy) - (by-ay)(dx-cx)
///```
fn calc_intersection(ax: f64, ay: f64, bx: f64, by: f64,
                     cx: f64, cy: f64, dx: f64, dy: f64) -> Option<Point> {
    let intersection_epsilon = 1.0e-30;
    let num = (ay-cy) * (dx-cx) - (ax-cx) * (dy-cy);
    let den = (bx-ax) * (dy-cy) - (by-ay) * (dx-cx);
    // Lines are Parallel or Co-Linear
    if den.abs() < intersection_epsilon {
        return None;
    }
    let r = num / den;
    Some(Point::new(ax + r * (bx-ax), ay + r * (by-ay)))
}
