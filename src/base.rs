//! Rendering Base

use crate::pixfmt::Pixfmt;
use crate::pixfmt::Format;
use crate::color::Rgba8;
use crate::error::Result;
use crate::Color;
use crate::Pixel;
use crate::PixelData;

use std::cmp::min;
use std::cmp::max;
use std::path::Path;

/// Rendering Base
///
/// Clips spans to the canvas before blending into the underlying [Pixel]
/// implementation
///
/// [Pixel]: ../trait.Pixel.html
#[derive(Debug,Default,Clone)]
pub struct RenderingBase<T> {
    pub pixf: T,
}

impl<T: Pixel> RenderingBase<T> {
    /// Create new Rendering Base from Pixel Format
    pub fn new(pixf: T) -> RenderingBase<T> {
        RenderingBase { pixf }
    }
    /// Pixel limits, (xmin, xmax, ymin, ymax), inclusive
    pub fn limits(&self) -> (i64,i64,i64,i64) {
        let w = self.pixf.width() as i64;
        let h = self.pixf.height() as i64;
        (0, w-1, 0, h-1)
    }
    /// Set every pixel to `color`
    pub fn clear<C: Color>(&mut self, color: C) {
        let (w, h) = (self.pixf.width(), self.pixf.height());
        for y in 0 .. h {
            for x in 0 .. w {
                self.pixf.set((x,y), color);
            }
        }
    }
    /// Blend a color along y from x1 to x2, inclusive, with a single cover
    pub fn blend_hline<C: Color>(&mut self, x1: i64, y: i64, x2: i64, c: C, cover: u8) {
        let (xmin,xmax,ymin,ymax) = self.limits();
        let (x1,x2) = if x2 > x1 { (x1,x2) } else { (x2,x1) };
        if y > ymax || y < ymin || x1 > xmax || x2 < xmin || cover == 0 {
            return;
        }
        let x1 = max(x1, xmin);
        let x2 = min(x2, xmax);
        for x in x1 ..= x2 {
            self.pixf.blend_pix((x as usize, y as usize), c, cover);
        }
    }
    /// Blend a color along y starting at x with varying covers
    ///
    /// Pixels outside the canvas are skipped
    pub fn blend_solid_hspan<C: Color>(&mut self, x: i64, y: i64, c: C, covers: &[u8]) {
        let (xmin,xmax,ymin,ymax) = self.limits();
        if y > ymax || y < ymin {
            return;
        }
        let (mut x, mut len, mut off) = (x, covers.len() as i64, 0);
        if x < xmin {
            len -= xmin - x;
            if len <= 0 {
                return;
            }
            off += xmin - x;
            x = xmin;
        }
        if x + len - 1 > xmax {
            len = xmax - x + 1;
            if len <= 0 {
                return;
            }
        }
        let covers = &covers[off as usize .. (off + len) as usize];
        for (i, &cover) in covers.iter().enumerate() {
            if cover != 0 {
                self.pixf.blend_pix(((x + i as i64) as usize, y as usize), c, cover);
            }
        }
    }
}

impl<T: Format> RenderingBase<Pixfmt<T>> {
    /// Underlying pixel data
    pub fn as_bytes(&self) -> &[u8] {
        self.pixf.pixeldata()
    }
    /// Write the image to a file, format by extension
    pub fn to_file<P: AsRef<Path>>(&self, filename: P) -> Result<()> {
        crate::file::write_file::<T, P>(self.pixf.pixeldata(),
                                        self.pixf.width(), self.pixf.height(),
                                        filename)
    }
    /// Pixel at (x,y)
    pub fn pixel(&self, x: usize, y: usize) -> Rgba8 {
        self.pixf.get((x,y))
    }
}
