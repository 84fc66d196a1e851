//! Cell Rasterizer
//!
//! Exact area coverage, swept row by row from a [RasterizerCell]
//!
//! [RasterizerCell]: ../cell/struct.RasterizerCell.html

use crate::POLY_SUBPIXEL_SHIFT;
use crate::POLY_SUBPIXEL_SCALE;

use crate::clip::Clip;
use crate::clip::Rectangle;
use crate::scan::Scanline;
use crate::cell::RasterizerCell;
use crate::error::Error;
use crate::error::Result;

use crate::Rasterize;

use std::str::FromStr;

use log::trace;

/// Winding rule deciding which regions are inside
#[derive(Debug,PartialEq,Copy,Clone)]
pub enum FillRule {
    /// Inside where the winding number is not zero
    NonZero,
    /// Inside where the winding number is odd
    EvenOdd,
}
impl Default for FillRule {
    fn default() -> FillRule {
        FillRule::NonZero
    }
}
impl FromStr for FillRule {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "nonzero" | "non-zero" => Ok(FillRule::NonZero),
            "evenodd" | "even-odd" => Ok(FillRule::EvenOdd),
            _ => Err(Error::UnsupportedFillRule(s.to_string())),
        }
    }
}

impl FillRule {
    /// Apply the rule to an accumulated, unsigned coverage
    ///
    /// `a` is in units of full pixels; one full winding is 1.0
    pub fn apply(&self, a: f64) -> f32 {
        let a = match self {
            FillRule::NonZero => a.min(1.0),
            FillRule::EvenOdd => {
                let a = a % 2.0;
                if a > 1.0 { 2.0 - a } else { a }
            }
        };
        a as f32
    }
    /// Winding number counts as inside
    pub fn is_inside(&self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

#[derive(Debug,PartialEq,Copy,Clone)]
pub enum PathStatus {
    Initial,
    Closed,
    MoveTo,
    LineTo
}
impl Default for PathStatus {
    fn default() -> PathStatus {
        PathStatus::Initial
    }
}

/// Rasterizer for Anti-Aliased Scanlines
///
/// Lines are clipped, converted to 24.8 fixed point and accumulated into
/// cells.
///
/// # Example
///
///     use scanfill::{Rasterize, RasterizerScanlineAA, Rectangle, Scanline, Point};
///
///     let mut ras = RasterizerScanlineAA::new();
///     ras.clip_box(Rectangle::new(-1.0, -1.0, 11.0, 11.0));
///     ras.add_polygon(&[Point::new(2.0, 2.0), Point::new(4.0, 2.0),
///                       Point::new(4.0, 5.0), Point::new(2.0, 5.0)]);
///     assert!(ras.rewind_scanlines());
///     let mut sl = Scanline::new();
///     assert!(ras.sweep_scanline(&mut sl));
///     assert_eq!(sl.y, 2);
///     assert_eq!(sl.spans[0].x, 2);
///     assert_eq!(sl.spans[0].covers, vec![1.0, 1.0]);
///
#[derive(Debug, Default)]
pub struct RasterizerScanlineAA {
    clipper: Clip,
    outline: RasterizerCell,
    status: PathStatus,
    x0: f64,
    y0: f64,
    scan_y: i64,
    filling_rule: FillRule,
}

impl Rasterize for RasterizerScanlineAA {
    fn reset(&mut self) {
        self.outline.reset();
        self.status = PathStatus::Initial;
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
        self.clipper.line_to(&mut self.outline, x, y);
        self.status = PathStatus::LineTo;
    }
    fn close_polygon(&mut self) {
        if self.status == PathStatus::LineTo {
            trace!("CLOSE POLYGON: {} {}", self.x0, self.y0);
            self.clipper.line_to(&mut self.outline, self.x0, self.y0);
            self.status = PathStatus::Closed;
        }
    }
    fn rewind_scanlines(&mut self) -> bool {
        self.close_polygon();
        self.outline.sort_cells();
        if self.outline.total_cells() == 0 {
            false
        } else {
            self.scan_y = self.outline.min_y;
            true
        }
    }
    fn sweep_scanline(&mut self, sl: &mut Scanline) -> bool {
        loop {
            if self.scan_y > self.outline.max_y {
                return false;
            }
            sl.reset_spans();
            let cells = self.outline.scanline_cells( self.scan_y );
            let mut cover = 0;
            let mut i = 0;
            while i < cells.len() {
                let mut x = cells[i].x;
                let mut area = 0;
                // Accumulate all cells with the same x
                while i < cells.len() && cells[i].x == x {
                    area  += cells[i].area;
                    cover += cells[i].cover;
                    i += 1;
                }
                if area != 0 {
                    let alpha = self.calculate_alpha((cover << (POLY_SUBPIXEL_SHIFT + 1)) - area);
                    if alpha > 0.0 {
                        sl.add_cell(x, alpha);
                    }
                    x += 1;
                }
                if i < cells.len() && cells[i].x > x {
                    let alpha = self.calculate_alpha(cover << (POLY_SUBPIXEL_SHIFT + 1));
                    if alpha > 0.0 {
                        sl.add_span(x, cells[i].x - x, alpha);
                    }
                }
            }
            if sl.num_spans() != 0 {
                break;
            }
            self.scan_y += 1;
        }
        sl.finalize(self.scan_y);
        self.scan_y += 1;
        true
    }
    fn primitives(&self) -> usize {
        self.outline.total_cells()
    }
    fn min_x(&self) -> i64 {
        self.outline.min_x
    }
    fn max_x(&self) -> i64 {
        self.outline.max_x
    }
}

impl RasterizerScanlineAA {
    pub fn new() -> Self {
        Self { clipper: Clip::new(), status: PathStatus::Initial,
               outline: RasterizerCell::new(),
               x0: 0.0, y0: 0.0, scan_y: 0,
               filling_rule: FillRule::NonZero,
        }
    }
    /// Coverage in [0,1] from twice the covered area in subpixel units
    pub fn calculate_alpha(&self, area: i64) -> f32 {
        let full = (POLY_SUBPIXEL_SCALE * POLY_SUBPIXEL_SCALE * 2) as f64;
        self.filling_rule.apply(area.abs() as f64 / full)
    }
}
