//! Pixel Format

use crate::buffer::RenderingBuffer;
use crate::color::*;

use crate::Color;
use crate::Pixel;
use crate::PixelData;

use std::marker::PhantomData;

/// Layout of a color in memory
pub trait Format: Color {
    /// Bytes per pixel
    fn bpp() -> usize;
    /// Read a pixel from its components
    fn read(px: &[u8]) -> Rgba8;
    /// Write a pixel to its components
    fn write(px: &mut [u8], c: Rgba8);
}

impl Format for Rgba8 {
    fn bpp() -> usize { 4 }
    fn read(px: &[u8]) -> Rgba8 {
        Rgba8::new(px[0], px[1], px[2], px[3])
    }
    fn write(px: &mut [u8], c: Rgba8) {
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
        px[3] = c.a;
    }
}

impl Format for Rgb8 {
    fn bpp() -> usize { 3 }
    fn read(px: &[u8]) -> Rgba8 {
        Rgba8::new(px[0], px[1], px[2], 255)
    }
    fn write(px: &mut [u8], c: Rgba8) {
        px[0] = c.r;
        px[1] = c.g;
        px[2] = c.b;
    }
}

/// Pixel Format Wrapper around raw pixel component data
///
#[derive(Debug,Clone)]
pub struct Pixfmt<T> {
    rbuf: RenderingBuffer,
    phantom: PhantomData<T>,
}

impl<T: Format> Pixfmt<T> {
    /// Create new Pixel Format of width * height * bpp
    ///
    /// Allocates memory of width * height * bpp
    pub fn new(width: usize, height: usize) -> Self {
        Self { rbuf: RenderingBuffer::new(width, height, T::bpp()),
               phantom: PhantomData
        }
    }
    /// Size of Rendering Buffer in bytes; width * height * bpp
    pub fn size(&self) -> usize {
        self.rbuf.len()
    }
    /// Clear the Image
    ///
    /// All color components are set to 255, including `alpha` if present
    ///
    ///     use scanfill::{Pixel,Pixfmt,Rgb8,Rgba8};
    ///
    ///     let mut pix = Pixfmt::<Rgb8>::new(2,2);
    ///     pix.clear();
    ///     assert_eq!(pix.get((0,0)), Rgba8::white());
    ///     assert_eq!(pix.get((1,1)), Rgba8::white());
    ///
    pub fn clear(&mut self) {
        self.rbuf.clear();
    }
    /// Set every pixel to the [Color] `c`
    ///
    /// [Color]: ../trait.Color.html
    pub fn fill<C: Color>(&mut self, c: C) {
        let c = Rgba8::from_trait(c);
        let bpp = T::bpp();
        self.rbuf.data.chunks_mut(bpp).for_each(|px| T::write(px, c));
    }
    /// Copies the [Color] `c` to pixel at (`x`,`y`)
    ///
    /// Locations outside of the region are ignored
    ///
    ///     use scanfill::{Pixel,Pixfmt,Rgba8};
    ///
    ///     let mut pix = Pixfmt::<Rgba8>::new(1,2);
    ///     let black = Rgba8::black();
    ///     pix.copy_pixel(0,1, black);
    ///     assert_eq!(pix.get((0,0)), Rgba8::new(0,0,0,0));
    ///     assert_eq!(pix.get((0,1)), black);
    ///
    ///     pix.copy_pixel(10,10, black); // Ignored, outside of range
    ///
    /// [Color]: ../trait.Color.html
    pub fn copy_pixel<C: Color>(&mut self, x: usize, y: usize, c: C) {
        if x >= self.rbuf.width || y >= self.rbuf.height {
            return;
        }
        self.set((x,y), c);
    }
    /// Split the image into disjoint horizontal bands of at most `rows` rows
    ///
    /// Bands address pixels with the coordinates of the full image and may
    /// be drawn on concurrently
    pub fn bands_mut(&mut self, rows: usize) -> Vec<PixfmtBand<'_, T>> {
        let width = self.rbuf.width;
        let stride = self.rbuf.stride();
        self.rbuf.bands_mut(rows).into_iter()
            .map(|(y0, data)| PixfmtBand {
                height: data.len() / stride,
                data, width, y0,
                phantom: PhantomData,
            })
            .collect()
    }
}

impl<T> PixelData for Pixfmt<T> {
    fn pixeldata(&self) -> &[u8] {
        &self.rbuf.data
    }
}

impl<T: Format> Pixel for Pixfmt<T> {
    fn width(&self) -> usize {
        self.rbuf.width
    }
    fn height(&self) -> usize {
        self.rbuf.height
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        T::read(&self.rbuf[id])
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: C) {
        T::write(&mut self.rbuf[id], Rgba8::from_trait(c));
    }
}

/// Horizontal band of a Pixfmt
///
/// Rows are addressed by their row in the full image
#[derive(Debug)]
pub struct PixfmtBand<'a, T> {
    data: &'a mut [u8],
    width: usize,
    /// First row of the band
    y0: usize,
    /// Number of rows in the band
    height: usize,
    phantom: PhantomData<T>,
}

impl<T> PixfmtBand<'_, T> {
    /// Rows covered by the band, `y0 .. y0 + height`
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.y0 .. self.y0 + self.height
    }
}

impl<T: Format> PixfmtBand<'_, T> {
    fn offset(&self, id: (usize, usize)) -> usize {
        assert!(id.0 < self.width, "request {} >= {} width :: band", id.0, self.width);
        assert!(self.rows().contains(&id.1), "request row {} outside band {:?}", id.1, self.rows());
        ((id.1 - self.y0) * self.width + id.0) * T::bpp()
    }
}

impl<T: Format> Pixel for PixfmtBand<'_, T> {
    /// Width of the full image
    fn width(&self) -> usize {
        self.width
    }
    /// One past the last row of the band
    fn height(&self) -> usize {
        self.y0 + self.height
    }
    fn get(&self, id: (usize, usize)) -> Rgba8 {
        let i = self.offset(id);
        T::read(&self.data[i .. i + T::bpp()])
    }
    fn set<C: Color>(&mut self, id: (usize, usize), c: C) {
        let i = self.offset(id);
        T::write(&mut self.data[i .. i + T::bpp()], Rgba8::from_trait(c));
    }
}
