use scanfill::{FillRule, LineCap, Path, Pixel, Pixfmt, RenderConfig, Renderer, RenderingBase, Rgba8, StrokeStyle};

fn star() -> Path {
    let mut path = Path::new();
    for i in 0 .. 5 {
        let a = (i as f64 * 144.0 - 90.0).to_radians();
        let (x, y) = (50.0 + 45.0 * a.cos(), 50.0 + 45.0 * a.sin());
        if i == 0 {
            path.move_to(x, y);
        } else {
            path.line_to(x, y);
        }
    }
    path.close_polygon();
    path
}

fn outline() -> StrokeStyle {
    let mut s = StrokeStyle::new(3.0);
    s.line_cap(LineCap::Round).dash(&[7.0, 4.0], 0.0);
    s
}

#[test_log::test]
fn bands_split_every_row_once() {
    for &(h, rows) in &[(23, 5), (20, 5), (7, 100), (1, 1), (9, 0)] {
        let mut pix = Pixfmt::<Rgba8>::new(7, h);
        pix.clear();
        {
            let bands = pix.bands_mut(rows);
            let mut next = 0;
            for band in &bands {
                let r = band.rows();
                assert_eq!(r.start, next, "{} {} {:?}", h, rows, r);
                assert!(r.end > r.start && r.end - r.start <= rows.max(1));
                next = r.end;
            }
            assert_eq!(next, h);
        }
        // Each band writes only its own rows
        for (i, mut band) in pix.bands_mut(rows).into_iter().enumerate() {
            for y in band.rows() {
                for x in 0 .. 7 {
                    band.set((x, y), Rgba8::new(i as u8, 0, 0, 255));
                }
            }
        }
        let rows = rows.max(1);
        for y in 0 .. h {
            for x in 0 .. 7 {
                assert_eq!(pix.get((x, y)), Rgba8::new((y / rows) as u8, 0, 0, 255));
            }
        }
    }
}

#[test_log::test]
#[should_panic]
fn band_rejects_rows_of_other_bands() {
    let mut pix = Pixfmt::<Rgba8>::new(4, 10);
    let mut bands = pix.bands_mut(5);
    bands[1].set((0, 2), Rgba8::black());
}

#[test_log::test]
fn banded_composite_matches_composite() {
    let r = Renderer::new(RenderConfig::default()).unwrap();
    let fill = r.fill_coverage(&star(), FillRule::EvenOdd, 100, 100);
    let stroke = r.stroke_coverage(&star(), &outline(), 100, 100).unwrap();
    for &aa in &[true, false] {
        let mut a = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
        let mut b = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
        a.clear(Rgba8::white());
        b.clear(Rgba8::white());
        for (cov, color) in &[(&fill, Rgba8::new(0, 0, 255, 200)), (&stroke, Rgba8::new(255, 0, 0, 255))] {
            scanfill::composite(cov, &mut a, *color, aa);
            scanfill::composite_bands(cov, &mut b, *color, aa);
        }
        assert!(a.as_bytes().iter().any(|&v| v != 255));
        assert_eq!(a.as_bytes(), b.as_bytes());
    }
}

#[test_log::test]
fn fill_and_stroke_matches_fill_then_stroke() {
    let r = Renderer::new(RenderConfig::default().fill_rule(FillRule::EvenOdd)).unwrap();
    let blue = Rgba8::new(0, 0, 255, 255);
    let red = Rgba8::new(255, 0, 0, 160);

    let mut a = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    a.clear(Rgba8::white());
    r.fill_and_stroke(&star(), blue, &outline(), red, &mut a).unwrap();

    let mut b = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    b.clear(Rgba8::white());
    r.fill(&star(), blue, &mut b).unwrap();
    r.stroke(&star(), &outline(), red, &mut b).unwrap();

    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.pixel(50, 20), blue);
    assert_eq!(a.pixel(50, 50), Rgba8::white());
}

#[cfg(feature = "multithreading")]
#[test_log::test]
fn parallel_bands_match_sequential() {
    let r = Renderer::new(RenderConfig::default()).unwrap();
    let cov = r.fill_coverage(&star(), FillRule::NonZero, 100, 100);
    let mut a = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    let mut b = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    a.clear(Rgba8::white());
    b.clear(Rgba8::white());
    scanfill::composite(&cov, &mut a, Rgba8::black(), true);
    rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap()
        .install(|| scanfill::composite_bands(&cov, &mut b, Rgba8::black(), true));
    assert_eq!(a.as_bytes(), b.as_bytes());
}
