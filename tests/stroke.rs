
use scanfill::{Backend, Error, LineCap, LineJoin, Path, Point, RenderConfig, Renderer, Shape, StrokeStyle};
use scanfill::{Dash, Pixfmt, Polyline, Rectangle, RenderingBase, Rgba8, Stroker};

fn renderer(backend: Backend) -> Renderer {
    Renderer::new(RenderConfig::default().backend(backend)).unwrap()
}

fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Path {
    let mut path = Path::new();
    path.move_to(x0, y0);
    path.line_to(x1, y1);
    path
}

fn style(width: f64, cap: LineCap) -> StrokeStyle {
    let mut s = StrokeStyle::new(width);
    s.line_cap(cap);
    s
}

#[test_log::test]
fn butt_line_is_a_rect() {
    let path = line(20.0, 50.0, 80.0, 50.0);
    for &backend in &[Backend::Scanline, Backend::Cell] {
        let cov = renderer(backend)
            .stroke_coverage(&path, &style(4.0, LineCap::Butt), 100, 100).unwrap();
        for (x, y, c) in cov.pixels() {
            let inside = (20..80).contains(&x) && (48..52).contains(&y);
            assert_eq!(c, if inside { 1.0 } else { 0.0 }, "{:?} ({},{})", backend, x, y);
        }
        assert_eq!(cov.total(), 240.0);
    }
}

#[test_log::test]
fn cap_extents() {
    let path = line(20.0, 50.0, 80.0, 50.0);
    let r = renderer(Backend::Cell);
    let butt = r.stroke_coverage(&path, &style(4.0, LineCap::Butt), 100, 100).unwrap();
    let square = r.stroke_coverage(&path, &style(4.0, LineCap::Square), 100, 100).unwrap();
    let round = r.stroke_coverage(&path, &style(4.0, LineCap::Round), 100, 100).unwrap();

    assert!((butt.total() - 240.0).abs() < 1e-3);
    assert!((square.total() - 256.0).abs() < 1e-3);
    // Round caps are polygons inscribed in the half discs
    let disc = std::f64::consts::PI * 4.0;
    assert!(round.total() > 240.0 + 0.85 * disc, "{}", round.total());
    assert!(round.total() < 240.0 + disc, "{}", round.total());

    assert_eq!(butt.coverage_at(18, 49), 0.0);
    assert_eq!(square.coverage_at(18, 49), 1.0);
    assert!(round.coverage_at(18, 49) > 0.0);
    assert_eq!(round.coverage_at(17, 49), 0.0);
}

#[test_log::test]
fn zero_length_dots() {
    let path = line(50.0, 50.0, 50.0, 50.0);
    let r = renderer(Backend::Cell);
    let butt = r.stroke_coverage(&path, &style(10.0, LineCap::Butt), 100, 100).unwrap();
    let square = r.stroke_coverage(&path, &style(10.0, LineCap::Square), 100, 100).unwrap();
    let round = r.stroke_coverage(&path, &style(10.0, LineCap::Round), 100, 100).unwrap();

    assert!(butt.is_empty());
    assert!((square.total() - 100.0).abs() < 1e-3);
    assert_eq!(square.coverage_at(45, 45), 1.0);
    assert_eq!(square.coverage_at(44, 50), 0.0);
    let disc = std::f64::consts::PI * 25.0;
    assert!(round.total() > 0.9 * disc && round.total() < disc, "{}", round.total());
    assert_eq!(round.coverage_at(50, 50), 1.0);
    assert_eq!(round.coverage_at(45, 45), 0.0);
}

#[test_log::test]
fn footprint_near_path() {
    let mut path = Path::new();
    path.move_to(10.0, 10.0);
    path.line_to(70.0, 40.0);
    path.quad_to(90.0, 60.0, 60.0, 85.0);
    let w = 6.0;
    let mut s = style(w, LineCap::Round);
    s.line_join(LineJoin::Round);

    let flat = scanfill::Flattener::new(0.25).flatten_subpath(&path.subpaths()[0]);
    for &backend in &[Backend::Scanline, Backend::Cell] {
        let cov = renderer(backend).stroke_coverage(&path, &s, 100, 100).unwrap();
        assert!(cov.total() > 0.0);
        for (x, y, c) in cov.pixels() {
            if c == 0.0 {
                continue;
            }
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let d = flat.points.windows(2)
                .map(|v| scanfill::dist_to_segment(&p, &v[0], &v[1]))
                .fold(std::f64::INFINITY, f64::min);
            assert!(d <= w / 2.0 + 1.0, "{:?} ({},{}) {} {}", backend, x, y, d, c);
        }
    }
}

#[test_log::test]
fn miter_reverts_to_bevel() {
    let mut path = Path::new();
    path.move_to(20.0, 80.0);
    path.line_to(50.0, 20.0);
    path.line_to(80.0, 80.0);

    let mut miter = style(6.0, LineCap::Butt);
    miter.line_join(LineJoin::Miter).miter_limit(20.0);
    let mut limited = miter.clone();
    limited.miter_limit(2.0);
    let mut bevel = style(6.0, LineCap::Butt);
    bevel.line_join(LineJoin::Bevel);

    let r = renderer(Backend::Cell);
    let m = r.stroke_coverage(&path, &miter, 100, 100).unwrap();
    let l = r.stroke_coverage(&path, &limited, 100, 100).unwrap();
    let b = r.stroke_coverage(&path, &bevel, 100, 100).unwrap();

    assert!(m.coverage_at(50, 15) > 0.0);
    assert_eq!(l.coverage_at(50, 15), 0.0);
    assert!(m.total() > l.total());
    assert!((l.total() - b.total()).abs() < 1e-3);
}

#[test_log::test]
fn closed_stroke_keeps_interior_empty() {
    let path = Shape::Rect { x: 20.0, y: 20.0, w: 60.0, h: 60.0 }.to_path();
    for &backend in &[Backend::Scanline, Backend::Cell] {
        let cov = renderer(backend).stroke_coverage(&path, &style(2.0, LineCap::Butt), 100, 100).unwrap();
        assert_eq!(cov.coverage_at(50, 50), 0.0);
        assert_eq!(cov.coverage_at(50, 19), 1.0);
        assert_eq!(cov.coverage_at(50, 20), 1.0);
        assert_eq!(cov.coverage_at(19, 19), 1.0);
        assert_eq!(cov.coverage_at(50, 21), 0.0);
        assert!((cov.total() - (62.0 * 62.0 - 58.0 * 58.0)).abs() < 1e-3);
    }
}

#[test_log::test]
fn dashed_line() {
    let path = line(10.0, 50.0, 90.0, 50.0);
    let mut s = style(2.0, LineCap::Butt);
    s.dash(&[10.0, 5.0], 0.0);
    let cov = renderer(Backend::Scanline).stroke_coverage(&path, &s, 100, 100).unwrap();
    // On: 10..20, 25..35, 40..50, 55..65, 70..80, 85..90
    for x in 0 .. 100 {
        let on = [(10,20), (25,35), (40,50), (55,65), (70,80), (85,90)]
            .iter().any(|&(a,b)| x >= a && x < b);
        for y in 49 .. 51 {
            assert_eq!(cov.coverage_at(x, y), if on { 1.0 } else { 0.0 }, "({},{})", x, y);
        }
    }

    s.dash(&[10.0, 5.0], 5.0);
    let cov = renderer(Backend::Scanline).stroke_coverage(&path, &s, 100, 100).unwrap();
    assert_eq!(cov.coverage_at(12, 49), 1.0);
    assert_eq!(cov.coverage_at(17, 49), 0.0);
    assert_eq!(cov.coverage_at(22, 49), 1.0);
}

#[test_log::test]
fn odd_dash_repeats() {
    let dash = Dash::new(&[10.0, 5.0, 5.0], 0.0).unwrap();
    assert_eq!(dash.pattern(), &[10.0, 5.0, 5.0, 10.0, 5.0, 5.0]);
    assert!(dash.state_at(0.0).is_on());
    assert!(! dash.state_at(12.0).is_on());
    assert!(dash.state_at(16.0).is_on());
    assert!(! dash.state_at(27.0).is_on());
    assert!(dash.state_at(32.0).is_on());
    assert!(! dash.state_at(37.0).is_on());
    assert!(dash.state_at(41.0).is_on());
}

#[test_log::test]
fn closed_dash_merges_at_start() {
    let square = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0),
                                    Point::new(40.0, 40.0), Point::new(0.0, 40.0)], true);
    // On 0..25 35..60 70..95 105..130 140..160(..165)
    let runs = Dash::new(&[25.0, 10.0], 0.0).unwrap().runs(&square, None);
    assert_eq!(runs.len(), 4);
    assert!(runs.iter().all(|r| ! r.closed));
    let merged = &runs[runs.len() - 1];
    assert_eq!(merged.points.first(), Some(&Point::new(0.0, 20.0)));
    assert_eq!(merged.points.last(), Some(&Point::new(25.0, 0.0)));

    let runs = Dash::solid().runs(&square, None);
    assert_eq!(runs.len(), 1);
    assert!(runs[0].closed);
    assert_eq!(runs[0].points.len(), 4);
}

#[test_log::test]
fn dash_state_from_arc_length() {
    // Only the last 100 units of a very long line are visible
    let line = Polyline::new(vec![Point::new(-1.0e9, 5.0), Point::new(100.0, 5.0)], false);
    let clip = scanfill::Rectangle::new(0.0, 0.0, 100.0, 10.0);
    let dash = Dash::new(&[10.0, 5.0], 2.5).unwrap();
    let runs = dash.runs(&line, Some(&clip));
    // 1e9 + 2.5 = 66666666 * 15 + 12.5, so x = 0 is 2.5 before the next dash
    assert_eq!(runs.len(), 7);
    let close = |p: &Point, x: f64| (p.x - x).abs() < 1e-5 && p.y == 5.0;
    assert!(close(&runs[0].points[0], 2.5), "{:?}", runs[0]);
    assert!(close(&runs[0].points[1], 12.5), "{:?}", runs[0]);
    assert!(close(&runs[6].points[0], 92.5), "{:?}", runs[6]);
    assert!(close(&runs[6].points[1], 100.0), "{:?}", runs[6]);
}

#[test_log::test]
fn dash_entry_far_beyond_f64_steps() {
    // Dash lengths are below the spacing of f64 values at the start point
    let dash = Dash::new(&[10.0, 5.0], 0.0).unwrap();
    let clip = Rectangle::new(0.0, 0.0, 100.0, 10.0);
    for &x0 in &[-1.0e15, -4.0e17, -1.0e300] {
        let line = Polyline::new(vec![Point::new(x0, 5.0), Point::new(100.0, 5.0)], false);
        let runs = dash.runs(&line, Some(&clip));
        assert!(runs.len() >= 6 && runs.len() <= 8, "{} {}", x0, runs.len());
        let mut on = 0.0;
        for run in &runs {
            assert_eq!(run.points.len(), 2, "{} {:?}", x0, run);
            assert!(run.points.iter().all(|p| p.y == 5.0 && p.x >= 0.0 && p.x <= 100.0),
                    "{} {:?}", x0, run);
            let len = run.points[0].distance(&run.points[1]);
            assert!(len <= 10.0 + 1e-9, "{} {:?}", x0, run);
            on += len;
        }
        // Two thirds on, give or take a partial dash at either end
        assert!((on - 200.0 / 3.0).abs() <= 10.0, "{} {}", x0, on);
    }
}

#[test_log::test]
fn invalid_styles_are_rejected() {
    let path = line(10.0, 10.0, 90.0, 90.0);
    let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    ren_base.clear(Rgba8::white());

    let bad_width = [0.0, -1.0, std::f64::NAN, std::f64::INFINITY];
    for &w in &bad_width {
        let s = StrokeStyle::new(w);
        let err = scanfill::stroke(&path, &s, Rgba8::black(), &mut ren_base).unwrap_err();
        assert!(matches!(err, Error::InvalidWidth(_)), "{}", err);
    }

    let mut s = StrokeStyle::new(1.0);
    s.miter_limit(0.5);
    let err = scanfill::stroke(&path, &s, Rgba8::black(), &mut ren_base).unwrap_err();
    assert!(matches!(err, Error::InvalidMiterLimit(_)));

    for pattern in &[vec![-1.0, 2.0], vec![0.0, 0.0], vec![std::f64::NAN]] {
        let mut s = StrokeStyle::new(1.0);
        s.dash(pattern, 0.0);
        let err = scanfill::stroke(&path, &s, Rgba8::black(), &mut ren_base).unwrap_err();
        assert!(matches!(err, Error::InvalidDash(_)), "{}", err);
    }
    let mut s = StrokeStyle::new(1.0);
    s.dash(&[1.0], std::f64::NAN);
    assert!(s.validate().is_err());

    for &scale in &[0.0, -2.0, std::f64::NAN] {
        let mut s = StrokeStyle::new(1.0);
        s.approximation_scale(scale);
        let err = scanfill::stroke(&path, &s, Rgba8::black(), &mut ren_base).unwrap_err();
        assert!(matches!(err, Error::InvalidApproximationScale(_)), "{}", err);
    }

    assert!(ren_base.as_bytes().iter().all(|&v| v == 255));
}

#[test_log::test]
fn stroker_tolerance_must_be_positive() {
    let s = StrokeStyle::new(2.0);
    for &tol in &[0.0, -0.25, std::f64::NAN, std::f64::INFINITY] {
        let err = Stroker::new(&s, tol).unwrap_err();
        assert!(matches!(err, Error::InvalidTolerance(_)), "{}", err);
    }
    assert!(Stroker::new(&s, 0.25).is_ok());
}

#[test_log::test]
fn stroke_onto_canvas() {
    let path = line(20.0, 50.0, 80.0, 50.0);
    let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
    ren_base.clear(Rgba8::white());
    scanfill::stroke(&path, &style(2.0, LineCap::Butt), Rgba8::new(255,0,0,255), &mut ren_base).unwrap();
    assert_eq!(ren_base.pixel(50, 49), Rgba8::new(255,0,0,255));
    assert_eq!(ren_base.pixel(50, 50), Rgba8::new(255,0,0,255));
    assert_eq!(ren_base.pixel(50, 51), Rgba8::white());
    assert_eq!(ren_base.pixel(10, 50), Rgba8::white());
}
