
use scanfill::{Backend, Error, FillRule, LineCap, LineJoin, Path, Point, RenderConfig, Renderer};
use scanfill::{Pixfmt, RenderingBase, Rgba8, StrokeControl, StrokeStyle};

#[test_log::test]
fn parse_tags() {
    assert_eq!("nonzero".parse::<FillRule>().unwrap(), FillRule::NonZero);
    assert_eq!("Non-Zero".parse::<FillRule>().unwrap(), FillRule::NonZero);
    assert_eq!("evenodd".parse::<FillRule>().unwrap(), FillRule::EvenOdd);
    assert_eq!("even-odd".parse::<FillRule>().unwrap(), FillRule::EvenOdd);
    match "winding".parse::<FillRule>() {
        Err(Error::UnsupportedFillRule(s)) => assert_eq!(s, "winding"),
        other => panic!("{:?}", other),
    }

    assert_eq!("butt".parse::<LineCap>().unwrap(), LineCap::Butt);
    assert_eq!("ROUND".parse::<LineCap>().unwrap(), LineCap::Round);
    assert_eq!("square".parse::<LineCap>().unwrap(), LineCap::Square);
    assert!(matches!("flat".parse::<LineCap>(), Err(Error::UnsupportedCap(_))));

    assert_eq!("miter".parse::<LineJoin>().unwrap(), LineJoin::Miter);
    assert_eq!("round".parse::<LineJoin>().unwrap(), LineJoin::Round);
    assert_eq!("bevel".parse::<LineJoin>().unwrap(), LineJoin::Bevel);
    assert!(matches!("arcs".parse::<LineJoin>(), Err(Error::UnsupportedJoin(_))));
}

#[test_log::test]
fn defaults() {
    let c = RenderConfig::default();
    assert!(c.antialiasing);
    assert_eq!(c.fill_rule, FillRule::NonZero);
    assert_eq!(c.stroke_control, StrokeControl::Pure);
    assert_eq!(c.backend, Backend::Scanline);
    assert_eq!(c.tolerance, 0.25);

    let s = StrokeStyle::default();
    assert_eq!(s.get_width(), 1.0);
    assert_eq!(s.get_line_cap(), LineCap::Square);
    assert_eq!(s.get_line_join(), LineJoin::Miter);
    assert_eq!(s.get_miter_limit(), 10.0);
    assert!(s.validate().is_ok());
}

#[test_log::test]
fn invalid_tolerance() {
    for &t in &[0.0, -0.5, std::f64::NAN, std::f64::INFINITY] {
        let err = Renderer::new(RenderConfig::default().tolerance(t)).unwrap_err();
        assert!(matches!(err, Error::InvalidTolerance(_)), "{}", err);
    }
    assert!(Renderer::new(RenderConfig::default().tolerance(0.01)).is_ok());
}

#[test_log::test]
fn error_messages() {
    assert_eq!(Error::InvalidWidth(0.0).to_string(),
               "invalid stroke width 0, must be greater than 0");
    assert_eq!(Error::UnsupportedCap("flat".to_string()).to_string(),
               "unsupported line cap: flat");
}

#[test_log::test]
fn stroke_control_snaps() {
    let p = Point::new(3.2, 7.9);
    assert_eq!(StrokeControl::Pure.apply(p, true), p);
    assert_eq!(StrokeControl::Normalize.apply(p, true), Point::new(3.5, 7.5));
    assert_eq!(StrokeControl::Normalize.apply(p, false), Point::new(3.25, 8.25));
}

#[test_log::test]
fn normalized_lines_are_crisp() {
    let mut path = Path::new();
    path.move_to(10.0, 50.0);
    path.line_to(90.0, 50.0);
    let mut s = StrokeStyle::new(1.0);
    s.line_cap(LineCap::Butt);

    let pure = Renderer::new(RenderConfig::default()).unwrap()
        .stroke_coverage(&path, &s, 100, 100).unwrap();
    assert_eq!(pure.coverage_at(50, 49), 0.5);
    assert_eq!(pure.coverage_at(50, 50), 0.5);

    let config = RenderConfig::default().stroke_control(StrokeControl::Normalize);
    let crisp = Renderer::new(config).unwrap()
        .stroke_coverage(&path, &s, 100, 100).unwrap();
    assert_eq!(crisp.coverage_at(50, 49), 0.0);
    assert_eq!(crisp.coverage_at(50, 50), 1.0);
}

#[test_log::test]
fn aliased_fill_is_binary() {
    let mut path = Path::new();
    path.move_to(10.3, 10.7);
    path.line_to(50.1, 90.2);
    path.line_to(90.6, 10.4);
    path.close_polygon();

    for &backend in &[Backend::Scanline, Backend::Cell] {
        let config = RenderConfig::default().antialiasing(false).backend(backend);
        let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(100, 100));
        ren_base.clear(Rgba8::white());
        Renderer::new(config).unwrap().fill(&path, Rgba8::black(), &mut ren_base).unwrap();
        let mut black = 0;
        for y in 0 .. 100 {
            for x in 0 .. 100 {
                let p = ren_base.pixel(x, y);
                assert!(p == Rgba8::black() || p == Rgba8::white(), "{:?} ({},{}) {:?}", backend, x, y, p);
                if p == Rgba8::black() {
                    black += 1;
                }
            }
        }
        // Triangle area is about 3198
        assert!((black as f64 - 3198.0).abs() < 100.0, "{:?} {}", backend, black);
    }
}

#[test_log::test]
fn alpha_blending() {
    let path = scanfill::Shape::Rect { x: 0.0, y: 0.0, w: 4.0, h: 4.0 }.to_path();
    let mut ren_base = RenderingBase::new(Pixfmt::<Rgba8>::new(4, 4));
    ren_base.clear(Rgba8::white());
    scanfill::fill(&path, FillRule::NonZero, Rgba8::new(255, 0, 0, 128), &mut ren_base).unwrap();
    let p = ren_base.pixel(1, 1);
    assert_eq!(p.r, 255);
    assert!(p.g >= 126 && p.g <= 128, "{:?}", p);
    assert_eq!(p.g, p.b);
    assert_eq!(p.a, 255);
}
