//! Renderer
//!
//! Runs the pipeline from a Path to pixels: flattening, stroking, clipping,
//! rasterization and compositing.
//!
//! # Example
//!
//!     use scanfill::{Renderer, RenderConfig, Backend, Shape, Pixfmt, Rgba8, RenderingBase};
//!
//!     let config = RenderConfig::default().backend(Backend::Cell);
//!     let renderer = Renderer::new(config).unwrap();
//!
//!     let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(10, 10));
//!     ren_base.clear(Rgba8::white());
//!
//!     let rect = Shape::Rect { x: 2.0, y: 2.0, w: 3.0, h: 3.0 }.to_path();
//!     renderer.fill(&rect, Rgba8::black(), &mut ren_base).unwrap();
//!     assert_eq!(ren_base.pixel(3, 3), Rgba8::black());
//!     assert_eq!(ren_base.pixel(1, 1), Rgba8::white());
//!

use crate::paths::Path;
use crate::paths::SubPath;
use crate::flatten::Flattener;
use crate::stroke::StrokeStyle;
use crate::stroke::Stroker;
use crate::clip::Rectangle;
use crate::raster::FillRule;
use crate::raster::RasterizerScanlineAA;
use crate::edge::ScanlineRasterizer;
use crate::scan::Scanline;
use crate::scan::CoverageBuffer;
use crate::base::RenderingBase;
use crate::pixfmt::Pixfmt;
use crate::pixfmt::Format;
use crate::pixfmt::PixfmtBand;
use crate::config::RenderConfig;
use crate::config::Backend;
use crate::math::cover_u8;
use crate::error::Result;
use crate::paths::Point;

use crate::Rasterize;
use crate::Color;
use crate::Pixel;

use log::debug;
use log::warn;
use log::trace;
use log::log_enabled;
use log::Level;

/// Render a single Scanline (y-row) without Anti-Aliasing
///
/// Pixels with coverage of at least 0.5 are drawn with full coverage
pub fn render_scanline_bin_solid<T: Pixel, C: Color>(sl: &Scanline,
                                                     ren: &mut RenderingBase<T>,
                                                     color: C) {
    for span in &sl.spans {
        let mut start : Option<i64> = None;
        for (i, &c) in span.covers.iter().enumerate() {
            let x = span.x + i as i64;
            match (start, cover_u8(c, false) > 0) {
                (None, true) => start = Some(x),
                (Some(x0), false) => {
                    ren.blend_hline(x0, sl.y, x - 1, color, 255);
                    start = None;
                },
                _ => {},
            }
        }
        if let Some(x0) = start {
            ren.blend_hline(x0, sl.y, span.end() - 1, color, 255);
        }
    }
}

/// Render a single Scanline (y-row) with Anti-Aliasing
pub fn render_scanline_aa_solid<T: Pixel, C: Color>(sl: &Scanline,
                                                    ren: &mut RenderingBase<T>,
                                                    color: C) {
    for span in &sl.spans {
        let covers : Vec<u8> = span.covers.iter().map(|&c| cover_u8(c, true)).collect();
        ren.blend_solid_hspan(span.x, sl.y, color, &covers);
    }
}

/// Blend a color weighted by coverage into an image
pub fn composite<T: Pixel, C: Color>(cov: &CoverageBuffer,
                                     ren: &mut RenderingBase<T>,
                                     color: C,
                                     antialiasing: bool) {
    for sl in &cov.rows {
        if antialiasing {
            render_scanline_aa_solid(sl, ren, color);
        } else {
            render_scanline_bin_solid(sl, ren, color);
        }
    }
}

/// Blend a color weighted by coverage into an image, in horizontal bands
///
/// The image is split into disjoint bands of rows, one per thread. With the
/// `multithreading` feature the bands are drawn in parallel, otherwise in
/// order. The result is identical to [composite](fn.composite.html).
pub fn composite_bands<F, C>(cov: &CoverageBuffer,
                             ren: &mut RenderingBase<Pixfmt<F>>,
                             color: C,
                             antialiasing: bool)
    where F: Format + Send, C: Color + Send + Sync
{
    let rows = ren.pixf.height() / num_threads() + 1;
    let bands = ren.pixf.bands_mut(rows);
    #[cfg(feature = "multithreading")]
    {
        use rayon::prelude::*;
        bands.into_par_iter().for_each(|band| composite_band(cov, band, color, antialiasing));
    }
    #[cfg(not(feature = "multithreading"))]
    bands.into_iter().for_each(|band| composite_band(cov, band, color, antialiasing));
}

fn composite_band<F: Format, C: Color>(cov: &CoverageBuffer, band: PixfmtBand<'_, F>, color: C, antialiasing: bool) {
    let r = band.rows();
    let mut base = RenderingBase::new(band);
    for sl in cov.rows_between(r.start as i64, r.end as i64) {
        if antialiasing {
            render_scanline_aa_solid(sl, &mut base, color);
        } else {
            render_scanline_bin_solid(sl, &mut base, color);
        }
    }
}

#[cfg(feature = "multithreading")]
fn num_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "multithreading"))]
fn num_threads() -> usize {
    1
}

/// Path Renderer
///
/// Holds the configuration only; every call is independent of the others
#[derive(Debug,Copy,Clone,Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new Renderer
    ///
    /// Fails if the configuration is invalid
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
    /// SubPaths ready for flattening
    ///
    /// Non-finite SubPaths are dropped and stroke control is applied
    fn prepare(&self, path: &Path) -> Vec<SubPath> {
        if log_enabled!(Level::Trace) {
            for v in path.vertices() {
                trace!("VERTEX: {:?} {} {}", v.cmd, v.x, v.y);
            }
        }
        let aa = self.config.antialiasing;
        let control = self.config.stroke_control;
        path.subpaths().iter()
            .filter(|sub| ! sub.is_empty())
            .filter(|sub| {
                let ok = sub.is_finite();
                if ! ok {
                    warn!("dropping subpath with non-finite coordinates starting at {:?}", sub.start);
                }
                ok
            })
            .map(|sub| sub.map(|p| control.apply(p, aa)))
            .collect()
    }
    /// Rasterize closed polygons with the configured backend
    fn rasterize(&self, polygons: &[Vec<Point>], rule: FillRule, clip: Rectangle<f64>) -> CoverageBuffer {
        match self.config.backend {
            Backend::Scanline => rasterize(ScanlineRasterizer::new(), polygons, rule, clip),
            Backend::Cell => rasterize(RasterizerScanlineAA::new(), polygons, rule, clip),
        }
    }
    /// Coverage of a filled path on a `width` x `height` canvas
    ///
    /// Open SubPaths are closed implicitly
    pub fn fill_coverage(&self, path: &Path, rule: FillRule, width: usize, height: usize) -> CoverageBuffer {
        let clip = canvas(width, height).inflate(1.0);
        let flattener = Flattener::new(self.config.tolerance).cull(clip);
        let polygons : Vec<Vec<Point>> = self.prepare(path).iter()
            .map(|sub| flattener.flatten_subpath(sub).points)
            .collect();
        debug!("FILL: {} polygons, {} vertices", polygons.len(),
               polygons.iter().map(|p| p.len()).sum::<usize>());
        self.rasterize(&polygons, rule, clip)
    }
    /// Coverage of a stroked path on a `width` x `height` canvas
    ///
    /// The style is checked before any geometry is processed
    pub fn stroke_coverage(&self, path: &Path, style: &StrokeStyle, width: usize, height: usize) -> Result<CoverageBuffer> {
        let stroker = Stroker::new(style, self.config.tolerance)?;
        let canvas = canvas(width, height);
        let margin = canvas.inflate(style.margin());
        let flattener = Flattener::new(self.config.tolerance).cull(margin);
        let mut polygons = vec![];
        for sub in self.prepare(path) {
            let line = flattener.flatten_subpath(&sub);
            polygons.extend(stroker.outline(&line, Some(&margin)));
        }
        debug!("STROKE: {} polygons, {} vertices", polygons.len(),
               polygons.iter().map(|p| p.len()).sum::<usize>());
        Ok(self.rasterize(&polygons, FillRule::NonZero, canvas.inflate(1.0)))
    }
    /// Fill a path with a color using the configured fill rule
    pub fn fill<T: Pixel, C: Color>(&self, path: &Path, color: C, ren: &mut RenderingBase<T>) -> Result<()> {
        let cov = self.fill_coverage(path, self.config.fill_rule,
                                     ren.pixf.width(), ren.pixf.height());
        composite(&cov, ren, color, self.config.antialiasing);
        Ok(())
    }
    /// Stroke a path with a color
    pub fn stroke<T: Pixel, C: Color>(&self, path: &Path, style: &StrokeStyle, color: C, ren: &mut RenderingBase<T>) -> Result<()> {
        let cov = self.stroke_coverage(path, style, ren.pixf.width(), ren.pixf.height())?;
        composite(&cov, ren, color, self.config.antialiasing);
        Ok(())
    }
    /// Fill a path, then stroke it
    ///
    /// With the `multithreading` feature the fill and stroke are rasterized
    /// concurrently and each is composited in parallel bands. The fill is
    /// fully composited before the stroke.
    pub fn fill_and_stroke<F, C1, C2>(&self, path: &Path,
                                      fill_color: C1,
                                      style: &StrokeStyle,
                                      stroke_color: C2,
                                      ren: &mut RenderingBase<Pixfmt<F>>) -> Result<()>
        where F: Format + Send, C1: Color + Send + Sync, C2: Color + Send + Sync
    {
        let (w, h) = (ren.pixf.width(), ren.pixf.height());
        let rule = self.config.fill_rule;
        let aa = self.config.antialiasing;
        #[cfg(feature = "multithreading")]
        {
            let (fill, stroke) = rayon::join(|| self.fill_coverage(path, rule, w, h),
                                             || self.stroke_coverage(path, style, w, h));
            let stroke = stroke?;
            composite_bands(&fill, ren, fill_color, aa);
            composite_bands(&stroke, ren, stroke_color, aa);
        }
        #[cfg(not(feature = "multithreading"))]
        {
            let stroke = self.stroke_coverage(path, style, w, h)?;
            let fill = self.fill_coverage(path, rule, w, h);
            composite(&fill, ren, fill_color, aa);
            composite(&stroke, ren, stroke_color, aa);
        }
        Ok(())
    }
}

fn canvas(width: usize, height: usize) -> Rectangle<f64> {
    Rectangle::new(0.0, 0.0, width as f64, height as f64)
}

/// Rasterize closed polygons into a CoverageBuffer
pub fn rasterize<R: Rasterize>(mut ras: R, polygons: &[Vec<Point>], rule: FillRule, clip: Rectangle<f64>) -> CoverageBuffer {
    ras.clip_box(clip);
    ras.filling_rule(rule);
    for poly in polygons {
        ras.add_polygon(poly);
    }
    CoverageBuffer::from_rasterizer(&mut ras)
}

/// Fill a path with the default configuration and a fill rule
pub fn fill<T: Pixel, C: Color>(path: &Path, rule: FillRule, color: C, ren: &mut RenderingBase<T>) -> Result<()> {
    Renderer::new(RenderConfig::default().fill_rule(rule))?.fill(path, color, ren)
}

/// Stroke a path with the default configuration
pub fn stroke<T: Pixel, C: Color>(path: &Path, style: &StrokeStyle, color: C, ren: &mut RenderingBase<T>) -> Result<()> {
    Renderer::new(RenderConfig::default())?.stroke(path, style, color, ren)
}
