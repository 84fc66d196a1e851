//! Cell Accumulator
//!
//! Lines in 24.8 fixed point are broken into cells, one per pixel they
//! cross. Each cell records the signed height of the line within the pixel
//! (`cover`) and twice the area to the left of the line (`area`), both in
//! subpixel units.

use crate::POLY_SUBPIXEL_SCALE;
use crate::POLY_SUBPIXEL_SHIFT;
use crate::POLY_SUBPIXEL_MASK;
use crate::paths::Point;
use crate::LineSink;

use std::cmp::min;
use std::cmp::max;

use log::trace;

/// Pixel cell
#[derive(Debug,Copy,Clone,PartialEq, Default)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
    pub cover: i64,
    pub area: i64,
}

impl Cell {
    pub fn at(x: i64, y: i64) -> Self {
        Cell { x, y, cover: 0, area: 0 }
    }
    pub fn equal(&self, x: i64, y: i64) -> bool {
        self.x == x && self.y == y
    }
    pub fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
}

/// Convert a pixel coordinate to 24.8 fixed point
pub fn upscale(v: f64) -> i64 {
    (v * POLY_SUBPIXEL_SCALE as f64).round() as i64
}

/// Collection of Cells
///
/// The last cell is the current cell and receives cover and area until a
/// line moves to another pixel
#[derive(Debug)]
pub struct RasterizerCell {
    cells: Vec<Cell>,
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
    /// Cells of each row from min_y, sorted by x
    sorted_y: Vec<Vec<Cell>>,
}

impl Default for RasterizerCell {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterizerCell {
    pub fn new() -> Self {
        Self { cells: vec![],
               min_x: std::i64::MAX,
               min_y: std::i64::MAX,
               max_x: std::i64::MIN,
               max_y: std::i64::MIN,
               sorted_y: vec![],
        }
    }
    /// Remove all cells
    pub fn reset(&mut self) {
        self.max_x = std::i64::MIN;
        self.max_y = std::i64::MIN;
        self.min_x = std::i64::MAX;
        self.min_y = std::i64::MAX;
        self.sorted_y.clear();
        self.cells.clear();
    }
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }
    /// Distribute cells into rows and sort each row by x
    ///
    /// Cells added after sorting require another call
    pub fn sort_cells(&mut self) {
        self.pop_last_cell_if_empty();
        self.sorted_y.clear();
        if self.cells.is_empty() || self.max_y < self.min_y {
            return;
        }
        let nrows = (self.max_y - self.min_y + 1) as usize;
        self.sorted_y = vec![vec![]; nrows];
        for c in self.cells.iter().filter(|c| ! c.is_empty()) {
            let y = (c.y - self.min_y) as usize;
            self.sorted_y[y].push(*c);
        }
        for row in self.sorted_y.iter_mut() {
            row.sort_by_key(|c| c.x);
        }
        trace!("SORT_CELLS: {} cells in {} rows from {}", self.cells.len(), nrows, self.min_y);
    }
    /// Cells on row `y`, sorted by x
    pub fn scanline_cells(&self, y: i64) -> &[Cell] {
        if y < self.min_y {
            return &[];
        }
        self.sorted_y.get((y - self.min_y) as usize).map(|r| r.as_slice()).unwrap_or(&[])
    }
    fn curr_cell(&mut self) -> &mut Cell {
        if self.cells.is_empty() {
            self.cells.push(Cell::at(0, 0));
        }
        let n = self.cells.len();
        &mut self.cells[n-1]
    }
    fn pop_last_cell_if_empty(&mut self) {
        if self.cells.last().map(|c| c.is_empty()).unwrap_or(false) {
            self.cells.pop();
        }
    }
    fn set_curr_cell(&mut self, x: i64, y: i64)  {
        let same = self.cells.last().map(|c| c.equal(x, y)).unwrap_or(false);
        if ! same {
            self.pop_last_cell_if_empty();
            self.cells.push( Cell::at(x,y) );
        }
    }
    /// Add a line within a single row `ey`
    ///
    /// `y1` and `y2` are subpixel offsets within the row
    fn render_hline(&mut self, ey: i64, x1: i64, y1: i64, x2: i64, y2: i64) {
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let fx1 = x1  & POLY_SUBPIXEL_MASK;
        let fx2 = x2  & POLY_SUBPIXEL_MASK;

        // Horizontal Line
        if y1 == y2 {
            self.set_curr_cell(ex2, ey);
            return;
        }

        // Single Cell
        if ex1 == ex2 {
            let cell = self.curr_cell();
            cell.cover += y2-y1;
            cell.area  += (fx1 + fx2) * (y2-y1);
            return;
        }
        // Adjacent Cells on Same Line
        let (mut p, first, incr, dx) = if x2-x1 < 0 {
            (fx1 * (y2-y1), 0,-1, x1-x2)
        } else {
            ((POLY_SUBPIXEL_SCALE - fx1) * (y2-y1), POLY_SUBPIXEL_SCALE, 1, x2-x1)
        };
        let mut delta = p / dx;
        let mut xmod =  p % dx;

        if xmod < 0 {
            delta -= 1;
            xmod += dx;
        }
        {
            let cell = self.curr_cell();
            cell.cover += delta;
            cell.area  += (fx1 + first) * delta;
        }
        let mut ex1 = ex1 + incr;
        self.set_curr_cell(ex1, ey);
        let mut y1 = y1 + delta;

        if ex1 != ex2 {
            p = POLY_SUBPIXEL_SCALE * (y2 - y1 + delta);
            let mut lift = p / dx;
            let mut rem = p % dx;
            if rem < 0 {
                lift -= 1;
                rem += dx;
            }
            xmod -= dx;

            while ex1 != ex2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dx;
                    delta += 1;
                }
                {
                    let cell = self.curr_cell();
                    cell.cover += delta;
                    cell.area  += POLY_SUBPIXEL_SCALE * delta;
                }
                y1 += delta;
                ex1 += incr;
                self.set_curr_cell(ex1, ey);
            }
        }
        delta = y2-y1;
        let cell = self.curr_cell();
        cell.cover += delta;
        cell.area  += (fx2 + POLY_SUBPIXEL_SCALE - first) * delta;
    }

    /// Add a line in 24.8 fixed point
    pub fn add_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) {
        trace!("LINE: {} {} -> {} {}", x1,y1, x2,y2);
        let dx_limit = 16384 << POLY_SUBPIXEL_SHIFT;
        let dx = x2 - x1;
        // Split long lines in half
        if dx >= dx_limit || dx <= -dx_limit {
            let cx = (x1 + x2) / 2;
            let cy = (y1 + y2) / 2;
            self.add_line(x1, y1, cx, cy);
            self.add_line(cx, cy, x2, y2);
            return;
        }
        let dy = y2-y1;
        let ex1 = x1 >> POLY_SUBPIXEL_SHIFT;
        let ex2 = x2 >> POLY_SUBPIXEL_SHIFT;
        let ey1 = y1 >> POLY_SUBPIXEL_SHIFT;
        let ey2 = y2 >> POLY_SUBPIXEL_SHIFT;
        let fy1 = y1 &  POLY_SUBPIXEL_MASK;
        let fy2 = y2 &  POLY_SUBPIXEL_MASK;

        self.min_x = min(ex2, min(ex1, self.min_x));
        self.min_y = min(ey2, min(ey1, self.min_y));
        self.max_x = max(ex2, max(ex1, self.max_x));
        self.max_y = max(ey2, max(ey1, self.max_y));

        self.set_curr_cell(ex1, ey1);

        // Everything on a single row
        if ey1 == ey2 {
            self.render_hline(ey1, x1, fy1, x2, fy2);
            self.pop_last_cell_if_empty();
            return;
        }

        // Vertical Line, a single cell on each row
        if dx == 0 {
            let two_fx = (x1 - (ex1 << POLY_SUBPIXEL_SHIFT)) << 1;

            let (first, incr) = if dy < 0 {
                (0, -1)
            } else {
                (POLY_SUBPIXEL_SCALE, 1)
            };
            let delta = first - fy1;
            {
                let cell = self.curr_cell();
                cell.cover += delta;
                cell.area  += two_fx * delta;
            }

            let mut ey1 = ey1 + incr;
            self.set_curr_cell(ex1, ey1);
            let delta = first + first - POLY_SUBPIXEL_SCALE;
            let area = two_fx * delta;
            while ey1 != ey2 {
                {
                    let cell = self.curr_cell();
                    cell.cover = delta;
                    cell.area = area;
                }
                ey1 += incr;
                self.set_curr_cell(ex1, ey1);
            }
            let delta = fy2 - POLY_SUBPIXEL_SCALE + first;
            let cell = self.curr_cell();
            cell.cover += delta;
            cell.area += two_fx * delta;
            return;
        }

        // Several rows
        let (p, first, incr, dy) = if dy < 0 {
            (fy1 * dx, 0, -1, -dy)
        } else {
            ((POLY_SUBPIXEL_SCALE - fy1) * dx, POLY_SUBPIXEL_SCALE, 1, dy)
        };
        let mut delta = p / dy;
        let mut xmod  = p % dy;
        if xmod < 0 {
            delta -= 1;
            xmod += dy;
        }
        let mut x_from = x1 + delta;
        self.render_hline(ey1, x1, fy1, x_from, first);
        let mut ey1 = ey1 + incr;
        self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
        if ey1 != ey2 {
            let p = POLY_SUBPIXEL_SCALE * dx;
            let mut lift = p / dy;
            let mut rem  = p % dy;
            if rem < 0 {
                lift -= 1;
                rem += dy;
            }
            xmod -= dy;
            while ey1 != ey2 {
                delta = lift;
                xmod += rem;
                if xmod >= 0 {
                    xmod -= dy;
                    delta += 1;
                }
                let x_to = x_from + delta;
                self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x_to, first);
                x_from = x_to;
                ey1 += incr;
                self.set_curr_cell(x_from >> POLY_SUBPIXEL_SHIFT, ey1);
            }
        }
        self.render_hline(ey1, x_from, POLY_SUBPIXEL_SCALE - first, x2, fy2);
        self.pop_last_cell_if_empty();
    }
}

impl LineSink for RasterizerCell {
    fn line(&mut self, a: Point, b: Point) {
        self.add_line(upscale(a.x), upscale(a.y), upscale(b.x), upscale(b.y));
    }
}
