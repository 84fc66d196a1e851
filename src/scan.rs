//! Scanlines and Coverage

use crate::Rasterize;

use log::debug;

/// Run of pixels on a single row
#[derive(Debug,Default,Clone,PartialEq)]
pub struct Span {
    /// First pixel
    pub x: i64,
    /// Number of pixels
    pub len: i64,
    /// Coverage of each pixel in [0,1]
    pub covers: Vec<f32>,
}

impl Span {
    /// One past the last pixel
    pub fn end(&self) -> i64 {
        self.x + self.len
    }
}

/// Coverage of a single row, as spans sorted by x
#[derive(Debug,Default,Clone)]
pub struct Scanline {
    last_x: i64,
    pub spans: Vec<Span>,
    pub y: i64,
}

const LAST_X: i64 = 0x7FFF_FFF0;

impl Scanline {
    pub fn new() -> Self {
        Self { last_x: LAST_X, y: 0, spans: vec![] }
    }
    /// Remove all spans
    pub fn reset_spans(&mut self) {
        self.last_x = LAST_X;
        self.spans.clear();
    }
    /// Set the row
    pub fn finalize(&mut self, y: i64) {
        self.y = y;
    }
    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }
    /// Add `len` pixels starting at `x` with equal coverage
    ///
    /// Pixels must be added in increasing x
    pub fn add_span(&mut self, x: i64, len: i64, cover: f32) {
        if len <= 0 {
            return;
        }
        match self.spans.last_mut() {
            Some(cur) if x == self.last_x + 1 => {
                cur.len += len;
                cur.covers.extend(std::iter::repeat(cover).take(len as usize));
            },
            _ => {
                self.spans.push(Span { x, len, covers: vec![cover; len as usize] });
            }
        }
        self.last_x = x + len - 1;
    }
    /// Add a single pixel at `x`
    ///
    /// Pixels must be added in increasing x
    pub fn add_cell(&mut self, x: i64, cover: f32) {
        match self.spans.last_mut() {
            Some(cur) if x == self.last_x + 1 => {
                cur.len += 1;
                cur.covers.push(cover);
            },
            _ => {
                self.spans.push(Span { x, len: 1, covers: vec![cover] });
            }
        }
        self.last_x = x;
    }
}

/// Coverage of every row produced by a rasterizer
///
/// Rows are sorted by y and only rows with coverage are kept
#[derive(Debug,Default,Clone)]
pub struct CoverageBuffer {
    pub rows: Vec<Scanline>,
}

impl CoverageBuffer {
    /// Sweep all scanlines out of a rasterizer
    pub fn from_rasterizer<R: Rasterize>(ras: &mut R) -> Self {
        let mut rows = vec![];
        if ras.rewind_scanlines() {
            let mut sl = Scanline::new();
            while ras.sweep_scanline(&mut sl) {
                rows.push(sl.clone());
            }
        }
        let buf = Self { rows };
        debug!("COVERAGE: {} primitives, {} rows, {} spans",
               ras.primitives(), buf.rows.len(),
               buf.rows.iter().map(|r| r.num_spans()).sum::<usize>());
        buf
    }
    /// No pixel has coverage
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.spans.is_empty())
    }
    /// Coverage at pixel (x,y), 0 if not covered
    pub fn coverage_at(&self, x: i64, y: i64) -> f32 {
        let row = match self.rows.binary_search_by_key(&y, |r| r.y) {
            Ok(i) => &self.rows[i],
            Err(_) => return 0.0,
        };
        row.spans.iter()
            .find(|s| x >= s.x && x < s.end())
            .map(|s| s.covers[(x - s.x) as usize])
            .unwrap_or(0.0)
    }
    /// Rows with `y0 <= y < y1`
    pub fn rows_between(&self, y0: i64, y1: i64) -> &[Scanline] {
        let i0 = self.rows.partition_point(|r| r.y < y0);
        let i1 = self.rows.partition_point(|r| r.y < y1);
        &self.rows[i0 .. i1.max(i0)]
    }
    /// Sum of the coverage of all pixels
    pub fn total(&self) -> f64 {
        self.rows.iter()
            .flat_map(|r| r.spans.iter())
            .flat_map(|s| s.covers.iter())
            .map(|&c| f64::from(c))
            .sum()
    }
    /// Iterate over every pixel with its coverage, (x, y, coverage)
    pub fn pixels(&self) -> impl Iterator<Item=(i64, i64, f32)> + '_ {
        self.rows.iter().flat_map(|r| {
            r.spans.iter().flat_map(move |s| {
                s.covers.iter().enumerate().map(move |(i, &c)| (s.x + i as i64, r.y, c))
            })
        })
    }
}
