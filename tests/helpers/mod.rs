#![allow(dead_code)]

use planis::geometry::{Border, Curve2D, PointLocation, Segment};
use planis::math::Point2;
use planis::operations::boolean::BooleanParams;
use planis::region::{CompoundShape, SimpleShape};

pub const AREA_TOL: f64 = 1e-6;

/// Installs a `RUST_LOG`-driven subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Border {
    Border::rectangle(p(x0, y0), p(x1, y1)).unwrap()
}

pub fn solid(x0: f64, y0: f64, x1: f64, y1: f64) -> SimpleShape {
    SimpleShape::from_border(rect(x0, y0, x1, y1))
}

pub fn ring(outer: [f64; 4], hole: [f64; 4]) -> SimpleShape {
    SimpleShape::new(
        rect(outer[0], outer[1], outer[2], outer[3]),
        vec![rect(hole[0], hole[1], hole[2], hole[3])],
    )
}

/// Edges of a polygon as individual line fragments.
pub fn fragments(points: &[Point2]) -> Vec<Segment> {
    (0..points.len())
        .map(|i| Segment::line(points[i], points[(i + 1) % points.len()]))
        .collect()
}

/// Deterministic shuffle: stride through the list and reverse every other
/// fragment.
pub fn scramble(segments: Vec<Segment>, stride: usize) -> Vec<Segment> {
    let n = segments.len();
    (0..n)
        .map(|k| {
            let s = segments[(k * stride) % n];
            if k % 2 == 1 {
                s.reversed()
            } else {
                s
            }
        })
        .collect()
}

/// Every vertex of `expected` has a counterpart in `border`, and the counts
/// agree.
pub fn assert_same_vertices(border: &Border, expected: &[Point2]) {
    let vertices = border.vertices();
    assert_eq!(vertices.len(), expected.len());
    for e in expected {
        assert!(
            vertices.iter().any(|v| (v - e).norm() < 1e-9),
            "missing vertex {e:?} in {vertices:?}"
        );
    }
}

/// Holes lie inside the outline and do not overlap each other.
pub fn assert_holes_valid(shape: &SimpleShape) {
    let params = BooleanParams::default();
    for hole in shape.holes() {
        assert!(!hole.is_ccw());
        for v in hole.vertices() {
            assert_ne!(shape.outline().locate(&v, 1e-9), PointLocation::Outside);
        }
    }
    let holes = shape.holes();
    for (i, a) in holes.iter().enumerate() {
        for b in &holes[i + 1..] {
            let overlap = SimpleShape::intersect(
                &SimpleShape::from_border(a.clone()),
                &SimpleShape::from_border(b.clone()),
                &params,
            )
            .unwrap();
            assert!(overlap.area() < AREA_TOL);
        }
    }
}

/// Members are valid and pairwise non-overlapping.
pub fn assert_disjoint(region: &CompoundShape) {
    let params = BooleanParams::default();
    let shapes = region.simple_shapes();
    for shape in shapes {
        assert_holes_valid(shape);
    }
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            let overlap = SimpleShape::intersect(a, b, &params).unwrap();
            assert!(overlap.area() < AREA_TOL, "members overlap by {}", overlap.area());
        }
    }
}
