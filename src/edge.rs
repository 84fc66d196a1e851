//! Edge Table Rasterizer
//!
//! Polygons are stored as a table of non-horizontal edges sorted by their
//! top. Each pixel row is sampled on [SUBSAMPLES] sub-scanlines; on each
//! one the edges crossing it form the active edge list, their crossings are
//! sorted by x and the intervals inside the shape, according to the fill
//! rule, are added with exact horizontal coverage.
//!
//! [SUBSAMPLES]: constant.SUBSAMPLES.html

use crate::paths::Point;
use crate::clip::Clip;
use crate::clip::Rectangle;
use crate::raster::FillRule;
use crate::raster::PathStatus;
use crate::scan::Scanline;
use crate::LineSink;
use crate::Rasterize;

use log::trace;

/// Number of sub-scanlines per pixel row
pub const SUBSAMPLES : i64 = 16;

/// Non-horizontal polygon edge
///
/// Stored top to bottom, `y0 < y1`, with the original direction in `dir`
#[derive(Debug,Copy,Clone,PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// +1 if the edge was drawn downward (increasing y), -1 if upward
    pub dir: i32,
}

impl Edge {
    /// Create an edge from a to b
    ///
    /// Returns None for horizontal or non-finite edges, which contribute
    /// nothing
    pub fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y || ! a.is_finite() || ! b.is_finite() {
            return None;
        }
        if a.y < b.y {
            Some(Edge { x0: a.x, y0: a.y, x1: b.x, y1: b.y, dir: 1 })
        } else {
            Some(Edge { x0: b.x, y0: b.y, x1: a.x, y1: a.y, dir: -1 })
        }
    }
    /// Location along x where the edge crosses `y`
    pub fn x_at(&self, y: f64) -> f64 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
    /// Edge crosses the horizontal line at `y`, top inclusive
    pub fn is_active(&self, y: f64) -> bool {
        self.y0 <= y && y < self.y1
    }
}

/// Collection of edges
#[derive(Debug,Clone)]
pub struct EdgeTable {
    edges: Vec<Edge>,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    sorted: bool,
}

impl Default for EdgeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeTable {
    pub fn new() -> Self {
        Self { edges: vec![],
               min_x: std::f64::INFINITY,
               min_y: std::f64::INFINITY,
               max_x: std::f64::NEG_INFINITY,
               max_y: std::f64::NEG_INFINITY,
               sorted: true,
        }
    }
    /// Remove all edges
    pub fn reset(&mut self) {
        *self = Self::new();
    }
    pub fn len(&self) -> usize {
        self.edges.len()
    }
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
    /// Add an edge, horizontal edges are dropped
    pub fn add(&mut self, a: Point, b: Point) {
        if let Some(e) = Edge::new(a, b) {
            self.min_x = self.min_x.min(e.x0.min(e.x1));
            self.max_x = self.max_x.max(e.x0.max(e.x1));
            self.min_y = self.min_y.min(e.y0);
            self.max_y = self.max_y.max(e.y1);
            self.edges.push(e);
            self.sorted = false;
        }
    }
    /// Sort edges by their top
    pub fn sort(&mut self) {
        if ! self.sorted {
            self.edges.sort_by(|a, b| a.y0.partial_cmp(&b.y0).unwrap_or(std::cmp::Ordering::Equal));
            self.sorted = true;
        }
    }
    /// Edges, sorted by y0 after `sort`
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

impl LineSink for EdgeTable {
    fn line(&mut self, a: Point, b: Point) {
        self.add(a, b);
    }
}

/// Rasterizer using an Edge Table and an Active Edge List
///
/// # Example
///
///     use scanfill::{Rasterize, ScanlineRasterizer, Rectangle, Scanline, Point};
///
///     let mut ras = ScanlineRasterizer::new();
///     ras.clip_box(Rectangle::new(-1.0, -1.0, 11.0, 11.0));
///     ras.add_polygon(&[Point::new(2.0, 2.0), Point::new(4.5, 2.0),
///                       Point::new(4.5, 5.0), Point::new(2.0, 5.0)]);
///     assert!(ras.rewind_scanlines());
///     let mut sl = Scanline::new();
///     assert!(ras.sweep_scanline(&mut sl));
///     assert_eq!(sl.y, 2);
///     assert_eq!(sl.spans[0].x, 2);
///     assert_eq!(sl.spans[0].covers, vec![1.0, 1.0, 0.5]);
///
#[derive(Debug, Default)]
pub struct ScanlineRasterizer {
    clipper: Clip,
    table: EdgeTable,
    status: PathStatus,
    x0: f64,
    y0: f64,
    filling_rule: FillRule,
    /// Next pixel row to sweep
    scan_y: i64,
    /// One past the last pixel row
    end_y: i64,
    /// Index of the next edge to enter the active list
    next_edge: usize,
    /// Edges crossing the current sub-scanline
    active: Vec<usize>,
    /// Crossings of the current sub-scanline, (x, dir)
    crossings: Vec<(f64, i32)>,
    /// Pixel column of the first accumulator entry
    x_origin: i64,
    /// Partial coverage per pixel
    acc: Vec<f32>,
    /// Full coverage, as differences between neighboring pixels
    diff: Vec<f32>,
}

impl ScanlineRasterizer {
    pub fn new() -> Self {
        Self { table: EdgeTable::new(), .. Default::default() }
    }
    /// Edges added so far
    pub fn edges(&self) -> &[Edge] {
        self.table.edges()
    }
    /// Add the interval [xa, xb) with weight `w` to the accumulators
    ///
    /// Returns the range of touched pixels
    fn add_interval(&mut self, xa: f64, xb: f64, w: f32) -> Option<(usize, usize)> {
        let width = self.acc.len();
        let fx0 = (xa - self.x_origin as f64).max(0.0);
        let fx1 = (xb - self.x_origin as f64).min(width as f64);
        if ! (fx1 > fx0) {
            return None;
        }
        let i0 = fx0.floor() as usize;
        let i1 = fx1.floor() as usize;
        if i0 == i1 {
            self.acc[i0] += ((fx1 - fx0) as f32) * w;
            return Some((i0, i0));
        }
        self.acc[i0] += ((i0 + 1) as f64 - fx0) as f32 * w;
        if i1 > i0 + 1 {
            self.diff[i0 + 1] += w;
            self.diff[i1] -= w;
        }
        if i1 < width {
            self.acc[i1] += ((fx1 - i1 as f64) as f32) * w;
            Some((i0, i1))
        } else {
            Some((i0, width - 1))
        }
    }
    /// Accumulate one sub-scanline at `sy`
    fn sample(&mut self, sy: f64, w: f32) -> Option<(usize, usize)> {
        let edges = self.table.edges();
        while self.next_edge < edges.len() && edges[self.next_edge].y0 <= sy {
            self.active.push(self.next_edge);
            self.next_edge += 1;
        }
        self.active.retain(|&i| edges[i].y1 > sy);

        self.crossings.clear();
        for &i in &self.active {
            let e = &edges[i];
            self.crossings.push((e.x_at(sy), e.dir));
        }
        self.crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut touched : Option<(usize, usize)> = None;
        let mut winding = 0;
        let mut start = 0.0;
        for k in 0 .. self.crossings.len() {
            let (x, dir) = self.crossings[k];
            let was_inside = self.filling_rule.is_inside(winding);
            winding += dir;
            let inside = self.filling_rule.is_inside(winding);
            if ! was_inside && inside {
                start = x;
            } else if was_inside && ! inside {
                if let Some((a, b)) = self.add_interval(start, x, w) {
                    touched = Some(match touched {
                        None => (a, b),
                        Some((ta, tb)) => (ta.min(a), tb.max(b)),
                    });
                }
            }
        }
        touched
    }
}

impl Rasterize for ScanlineRasterizer {
    fn reset(&mut self) {
        self.table.reset();
        self.status = PathStatus::Initial;
        self.active.clear();
        self.next_edge = 0;
    }
    fn clip_box(&mut self, r: Rectangle<f64>) {
        self.clipper.clip_box(r);
    }
    fn filling_rule(&mut self, rule: FillRule) {
        self.filling_rule = rule;
    }
    fn move_to_d(&mut self, x: f64, y: f64) {
        self.close_polygon();
        self.x0 = x;
        self.y0 = y;
        self.clipper.move_to(x, y);
        self.status = PathStatus::MoveTo;
    }
    fn line_to_d(&mut self, x: f64, y: f64) {
        self.clipper.line_to(&mut self.table, x, y);
        self.status = PathStatus::LineTo;
    }
    fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            self.clipper.line_to(&mut self.table, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }
    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        if self.table.is_empty() {
            return false;
        }
        self.table.sort();
        self.active.clear();
        self.next_edge = 0;
        self.scan_y = self.table.min_y.floor() as i64;
        self.end_y = self.table.max_y.ceil() as i64;
        self.x_origin = self.table.min_x.floor() as i64;
        let width = (self.table.max_x.ceil() as i64 - self.x_origin + 1).max(1) as usize;
        self.acc = vec![0.0; width];
        self.diff = vec![0.0; width + 1];
        trace!("EDGES: {} rows {} .. {} width {}", self.table.len(), self.scan_y, self.end_y, width);
        true
    }
    fn sweep_scanline(&mut self, sl: &mut Scanline) -> bool {
        let w = 1.0 / SUBSAMPLES as f32;
        while self.scan_y < self.end_y {
            let y = self.scan_y;
            self.scan_y += 1;
            // Skip rows before the next edge when nothing is active
            if self.active.is_empty() {
                match self.table.edges().get(self.next_edge) {
                    None => return false,
                    Some(e) if e.y0 >= (y + 1) as f64 => {
                        self.scan_y = e.y0.floor() as i64;
                        continue;
                    },
                    Some(_) => {},
                }
            }
            let mut touched : Option<(usize, usize)> = None;
            for s in 0 .. SUBSAMPLES {
                let sy = y as f64 + (s as f64 + 0.5) / SUBSAMPLES as f64;
                if let Some((a, b)) = self.sample(sy, w) {
                    touched = Some(match touched {
                        None => (a, b),
                        Some((ta, tb)) => (ta.min(a), tb.max(b)),
                    });
                }
            }
            let (i0, i1) = match touched {
                None => continue,
                Some(t) => t,
            };
            sl.reset_spans();
            let mut full = 0.0;
            for i in i0 ..= i1 {
                full += self.diff[i];
                let c = (self.acc[i] + full).min(1.0);
                if c > 0.0 {
                    sl.add_cell(self.x_origin + i as i64, c);
                }
                self.acc[i] = 0.0;
                self.diff[i] = 0.0;
            }
            self.diff[i1 + 1] = 0.0;
            if sl.num_spans() != 0 {
                sl.finalize(y);
                return true;
            }
        }
        false
    }
    fn primitives(&self) -> usize {
        self.table.len()
    }
    fn min_x(&self) -> i64 {
        self.table.min_x.floor() as i64
    }
    fn max_x(&self) -> i64 {
        self.table.max_x.ceil() as i64
    }
}
