
use scanfill::{Flattener, Path, PathCommand, Point, Rectangle, Shape, Vertex};
use scanfill::dist_to_segment;

fn cubic(p: &[Point; 4], t: f64) -> Point {
    let s = 1.0 - t;
    let (a, b, c, d) = (s*s*s, 3.0*s*s*t, 3.0*s*t*t, t*t*t);
    Point::new(a*p[0].x + b*p[1].x + c*p[2].x + d*p[3].x,
               a*p[0].y + b*p[1].y + c*p[2].y + d*p[3].y)
}

fn quad(p: &[Point; 3], t: f64) -> Point {
    let s = 1.0 - t;
    let (a, b, c) = (s*s, 2.0*s*t, t*t);
    Point::new(a*p[0].x + b*p[1].x + c*p[2].x,
               a*p[0].y + b*p[1].y + c*p[2].y)
}

fn dist_to_polyline(p: &Point, pts: &[Point]) -> f64 {
    pts.windows(2)
        .map(|v| dist_to_segment(p, &v[0], &v[1]))
        .fold(std::f64::INFINITY, f64::min)
}

#[test_log::test]
fn cubic_within_tolerance() {
    let ctrl = [Point::new(10.0, 10.0), Point::new(390.0, 0.0),
                Point::new(0.0, 390.0), Point::new(390.0, 390.0)];
    let mut path = Path::new();
    path.move_to(ctrl[0].x, ctrl[0].y);
    path.cubic_to(ctrl[1].x, ctrl[1].y, ctrl[2].x, ctrl[2].y, ctrl[3].x, ctrl[3].y);

    for &tol in &[1.0, 0.25, 0.05] {
        let pts : Vec<Point> = Flattener::new(tol).flatten(&path.subpaths()[0]).collect();
        assert_eq!(pts[0], ctrl[0]);
        assert_eq!(pts[pts.len()-1], ctrl[3]);
        for i in 0 ..= 2000 {
            let p = cubic(&ctrl, i as f64 / 2000.0);
            let d = dist_to_polyline(&p, &pts);
            assert!(d <= tol + 1e-9, "tol {} t {} d {}", tol, i, d);
        }
    }
}

#[test_log::test]
fn quad_within_tolerance() {
    let ctrl = [Point::new(0.0, 0.0), Point::new(50.0, 200.0), Point::new(100.0, 0.0)];
    let mut path = Path::new();
    path.move_to(ctrl[0].x, ctrl[0].y);
    path.quad_to(ctrl[1].x, ctrl[1].y, ctrl[2].x, ctrl[2].y);

    let coarse = Flattener::new(1.0).flatten_subpath(&path.subpaths()[0]);
    let fine = Flattener::new(0.01).flatten_subpath(&path.subpaths()[0]);
    assert!(fine.points.len() > coarse.points.len());
    for i in 0 ..= 2000 {
        let p = quad(&ctrl, i as f64 / 2000.0);
        assert!(dist_to_polyline(&p, &fine.points) <= 0.01 + 1e-9);
        assert!(dist_to_polyline(&p, &coarse.points) <= 1.0 + 1e-9);
    }
}

#[test_log::test]
fn lines_pass_through() {
    let path = Shape::Rect { x: 1.0, y: 2.0, w: 3.0, h: 4.0 }.to_path();
    let line = Flattener::default().flatten_subpath(&path.subpaths()[0]);
    assert!(line.closed);
    assert_eq!(line.points, vec![Point::new(1.0, 2.0), Point::new(4.0, 2.0),
                                 Point::new(4.0, 6.0), Point::new(1.0, 6.0)]);
}

#[test_log::test]
fn huge_circle_is_culled() {
    let r = 18_432_000.0;
    let c = 500.0 - r / std::f64::consts::SQRT_2;
    let path = Shape::Circle { cx: c, cy: c, r }.to_path();
    let view = Rectangle::new(0.0, 0.0, 1000.0, 1000.0).inflate(1.0);

    let pts : Vec<Point> = Flattener::new(0.25).cull(view)
        .flatten(&path.subpaths()[0]).collect();
    assert!(pts.len() < 500, "{}", pts.len());

    // Inside the view the polyline still follows the circle
    let center = Point::new(c, c);
    assert!(pts.iter().any(|p| view.contains(p.x, p.y)));
    let a0 = std::f64::consts::FRAC_PI_4;
    for i in -100 ..= 100 {
        let a = a0 + i as f64 * 4.0e-7;
        let p = Point::new(center.x + r * a.cos(), center.y + r * a.sin());
        if view.contains(p.x, p.y) {
            let d = dist_to_polyline(&p, &pts);
            assert!(d <= 0.26, "{:?} {}", p, d);
        }
    }
}

#[test_log::test]
fn depth_is_bounded() {
    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.cubic_to(1.0e12, 0.0, -1.0e12, 1.0, 0.0, 1.0);
    let pts : Vec<_> = Flattener::new(0.25).max_depth(8)
        .flatten(&path.subpaths()[0]).collect();
    assert_eq!(pts.len(), 1 + (1 << 8));
    assert!(pts.iter().all(|p| p.is_finite()));
}

#[test_log::test]
fn flatten_path_skips_empty() {
    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.move_to(5.0, 5.0);
    path.line_to(10.0, 5.0);
    let lines = Flattener::default().flatten_path(&path);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points, vec![Point::new(5.0, 5.0), Point::new(10.0, 5.0)]);
}

#[test_log::test]
fn vertices_follow_segments() {
    let mut path = Path::new();
    path.move_to(1.0, 2.0);
    path.line_to(3.0, 4.0);
    path.cubic_to(5.0, 6.0, 7.0, 8.0, 9.0, 10.0);
    path.close_polygon();
    path.move_to(20.0, 20.0);
    path.quad_to(25.0, 30.0, 30.0, 20.0);

    use PathCommand::*;
    assert_eq!(path.vertices(), vec![
        Vertex::new(1.0, 2.0, MoveTo),
        Vertex::new(3.0, 4.0, LineTo),
        Vertex::new(5.0, 6.0, Curve4),
        Vertex::new(7.0, 8.0, Curve4),
        Vertex::new(9.0, 10.0, Curve4),
        Vertex::new(1.0, 2.0, Close),
        Vertex::new(20.0, 20.0, MoveTo),
        Vertex::new(25.0, 30.0, Curve3),
        Vertex::new(30.0, 20.0, Curve3),
    ]);
    assert!(Path::new().vertices().is_empty());
}
