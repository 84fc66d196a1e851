
use scanfill::{Backend, FillRule, LineCap, LineJoin, Path, RenderConfig, Renderer, Shape, StrokeStyle};
use scanfill::{Pixfmt, RenderingBase, Rgb8, Rgba8};

const SIZE : usize = 1000;
const RECT_SIZE : f64 = 900.0 * 1024.0 * 5.0 * 30.0;
const CIRCLE_RADIUS : f64 = 1_843_200.0 * 10.0;

const BLUE : Rgba8 = Rgba8 { r: 0, g: 0, b: 255, a: 255 };
const RED : Rgba8 = Rgba8 { r: 255, g: 0, b: 0, a: 255 };

/// Wedge opening upwards from the center of the canvas
fn wedge() -> Path {
    wedge_of(RECT_SIZE)
}

fn wedge_of(size: f64) -> Path {
    let half = 0.5 * SIZE as f64;
    let mut p = Path::new();
    p.move_to(half, half);
    p.line_to(-size, -size);
    p.line_to(0.0, -size * 2.0);
    p.line_to(size, -size);
    p.line_to(half, half);
    p.close_polygon();
    p
}

/// Circle passing through the center of the canvas
fn circle() -> Path {
    let c = 0.5 * SIZE as f64 - CIRCLE_RADIUS / std::f64::consts::SQRT_2;
    Shape::Circle { cx: c, cy: c, r: CIRCLE_RADIUS }.to_path()
}

fn outline() -> StrokeStyle {
    let mut s = StrokeStyle::new(2.0);
    s.line_cap(LineCap::Butt)
        .line_join(LineJoin::Miter)
        .miter_limit(20.0)
        .dash(&[10.0, 5.0], 0.0);
    s
}

fn paint(backend: Backend, path: &Path, name: &str) -> RenderingBase<Pixfmt<Rgba8>> {
    let renderer = Renderer::new(RenderConfig::default().backend(backend)).unwrap();
    let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(SIZE, SIZE));
    ren_base.clear(Rgba8::white());
    renderer.fill_and_stroke(path, BLUE, &outline(), RED, &mut ren_base).unwrap();

    let file = std::env::temp_dir().join(format!("scanfill-{}-{:?}.png", name, backend));
    ren_base.to_file(&file).unwrap();
    let (data, w, h) = scanfill::file::read_file(&file).unwrap();
    assert_eq!((w, h), (SIZE, SIZE));
    assert_eq!(&data[..], ren_base.as_bytes());
    ren_base
}

/// Sum of the coverage on the canvas
fn canvas_total(cov: &scanfill::CoverageBuffer) -> f64 {
    let n = SIZE as i64;
    cov.pixels()
        .filter(|&(x, y, _)| x >= 0 && x < n && y >= 0 && y < n)
        .map(|(_, _, c)| f64::from(c))
        .sum()
}

fn count(ren_base: &RenderingBase<Pixfmt<Rgba8>>, c: Rgba8) -> usize {
    let mut n = 0;
    for y in 0 .. SIZE {
        for x in 0 .. SIZE {
            if ren_base.pixel(x, y) == c {
                n += 1;
            }
        }
    }
    n
}

#[test_log::test]
fn huge_wedge_coverage() {
    for &size in &[RECT_SIZE, 1.0e17, 1.0e200] {
        for &backend in &[Backend::Scanline, Backend::Cell] {
            let r = Renderer::new(RenderConfig::default().backend(backend)).unwrap();
            let path = wedge_of(size);
            let fill = r.fill_coverage(&path, FillRule::NonZero, SIZE, SIZE);
            let stroke = r.stroke_coverage(&path, &outline(), SIZE, SIZE).unwrap();
            for cov in &[&fill, &stroke] {
                assert!(cov.rows.len() <= SIZE + 2);
                assert!(cov.pixels().all(|(_, _, c)| c.is_finite() && c >= 0.0 && c <= 1.0));
            }
            // Area of the wedge inside the canvas, 500 * 1000 / 2
            let total = canvas_total(&fill);
            assert!((total - 250_000.0).abs() < 1.0, "{} {:?} {}", size, backend, total);
            // Two dashed edges of length 500 * sqrt 2, 2/3 on, width 2
            let want = 2.0 * 500.0 * std::f64::consts::SQRT_2 * 2.0 * 2.0 / 3.0;
            let total = canvas_total(&stroke);
            assert!((total - want).abs() / want < 0.05, "{} {:?} {}", size, backend, total);
        }
    }
}

#[test_log::test]
fn huge_wedge_image() {
    for &backend in &[Backend::Scanline, Backend::Cell] {
        let img = paint(backend, &wedge(), "wedge");
        assert_eq!(img.pixel(500, 300), BLUE);
        assert_eq!(img.pixel(100, 50), BLUE);
        assert_eq!(img.pixel(500, 700), Rgba8::white());
        assert_eq!(img.pixel(100, 300), Rgba8::white());
        // First dash starts at the apex
        assert_eq!(img.pixel(496, 496), RED);
        assert!(count(&img, RED) > 500);
    }
}

#[test_log::test]
fn huge_circle_image() {
    for &backend in &[Backend::Scanline, Backend::Cell] {
        let img = paint(backend, &circle(), "circle");
        assert_eq!(img.pixel(300, 300), BLUE);
        assert_eq!(img.pixel(900, 50), BLUE);
        assert_eq!(img.pixel(700, 700), Rgba8::white());
        assert_eq!(img.pixel(999, 999), Rgba8::white());
        assert!(count(&img, RED) > 500);
        let blue = count(&img, BLUE);
        assert!((blue as f64 - 500_000.0).abs() < 4000.0, "{:?} {}", backend, blue);
    }
}

#[test_log::test]
fn rgb_image_file() {
    let renderer = Renderer::new(RenderConfig::default()).unwrap();
    let mut ren_base = RenderingBase::new(Pixfmt::<Rgb8>::new(SIZE, SIZE));
    ren_base.clear(Rgba8::white());
    renderer.fill_and_stroke(&wedge(), BLUE, &outline(), RED, &mut ren_base).unwrap();

    let dir = std::env::temp_dir();
    let f1 = dir.join("scanfill-rgb-1.png");
    let f2 = dir.join("scanfill-rgb-2.png");
    ren_base.to_file(&f1).unwrap();
    ren_base.to_file(&f2).unwrap();
    assert!(scanfill::file::img_diff(&f1, &f2).unwrap());
    let (data, _, _) = scanfill::file::read_file(&f1).unwrap();
    assert_eq!(&data[500 * SIZE * 4 .. 500 * SIZE * 4 + 4], &[255, 255, 255, 255]);
}
