use std::f64::consts::{PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::{Matrix3, Point2, Rect2, ORIENTATION_EPS, TOLERANCE};

use super::curve::{Curve2D, Segment};

/// Classification of a point against a closed border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    OnBoundary,
    Outside,
}

/// An oriented closed loop of segments.
///
/// Consecutive segments share their vertex exactly: `segments[i].end_point()`
/// equals `segments[i + 1].start_point()`, and the last segment ends where the
/// first one starts. Positive signed area means counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    segments: Vec<Segment>,
}

impl Border {
    /// Builds a border from a chain of segments.
    ///
    /// Zero-length segments are dropped. Each remaining joint must close within
    /// `tolerance`; joints are then snapped so vertices are shared exactly.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotClosed`] when a joint gap exceeds
    /// `tolerance`, or [`GeometryError::Degenerate`] when fewer than two
    /// segments remain.
    pub fn from_segments(segments: Vec<Segment>, tolerance: f64) -> Result<Self> {
        let mut segments: Vec<Segment> = segments
            .into_iter()
            .filter(|s| !s.is_degenerate(TOLERANCE))
            .collect();
        if segments.len() < 2 {
            return Err(GeometryError::Degenerate(format!(
                "a border needs at least two segments, got {}",
                segments.len()
            ))
            .into());
        }

        let n = segments.len();
        for i in 0..n {
            let gap = (segments[i].end_point() - segments[(i + 1) % n].start_point()).norm();
            if gap > tolerance {
                return Err(GeometryError::NotClosed { index: i, gap }.into());
            }
        }

        snap_joints(&mut segments);
        Ok(Self { segments })
    }

    /// Builds a straight-edged border through `points`, closing back to the first.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct edges remain.
    pub fn from_points(points: &[Point2]) -> Result<Self> {
        let n = points.len();
        let segments = (0..n)
            .map(|i| Segment::line(points[i], points[(i + 1) % n]))
            .collect();
        Self::from_segments(segments, TOLERANCE)
    }

    /// Builds a border from `(vertex, bulge)` pairs; the bulge describes the
    /// segment leaving that vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two distinct segments remain.
    pub fn from_vertices(vertices: &[(Point2, f64)]) -> Result<Self> {
        let n = vertices.len();
        let segments = (0..n)
            .map(|i| Segment::arc(vertices[i].0, vertices[(i + 1) % n].0, vertices[i].1))
            .collect();
        Self::from_segments(segments, TOLERANCE)
    }

    /// Counter-clockwise axis-aligned rectangle spanned by two corners.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle has zero width or height.
    pub fn rectangle(a: Point2, b: Point2) -> Result<Self> {
        let r = Rect2::new(a, b);
        if r.width() < TOLERANCE || r.height() < TOLERANCE {
            return Err(GeometryError::Degenerate("rectangle has zero extent".into()).into());
        }
        Self::from_points(&[
            r.min,
            Point2::new(r.max.x, r.min.y),
            r.max,
            Point2::new(r.min.x, r.max.y),
        ])
    }

    /// Counter-clockwise circle made of two semicircular arcs.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive.
    pub fn circle(center: Point2, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("circle radius must be positive".into()).into());
        }
        let left = Point2::new(center.x - radius, center.y);
        let right = Point2::new(center.x + radius, center.y);
        Ok(Self {
            segments: vec![Segment::arc(left, right, 1.0), Segment::arc(right, left, 1.0)],
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Start points of all segments, in loop order.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point2> {
        self.segments.iter().map(Curve2D::start_point).collect()
    }

    /// Signed enclosed area; positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        self.segments.iter().map(Segment::signed_area_contribution).sum()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > ORIENTATION_EPS
    }

    /// The same loop traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            segments: self.segments.iter().rev().map(Curve2D::reversed).collect(),
        }
    }

    #[must_use]
    pub fn to_ccw(self) -> Self {
        if self.signed_area() < 0.0 {
            self.reversed()
        } else {
            self
        }
    }

    #[must_use]
    pub fn to_cw(self) -> Self {
        if self.signed_area() > 0.0 {
            self.reversed()
        } else {
            self
        }
    }

    /// Total boundary length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments.iter().map(Curve2D::length).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect2 {
        self.segments
            .iter()
            .fold(Rect2::empty(), |acc, s| acc.union(&s.bounds()))
    }

    /// Winding number of the loop around `p`. Undefined for points on the loop.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn winding_number(&self, p: &Point2) -> i32 {
        let total: f64 = self.segments.iter().map(|s| s.winding_angle(p)).sum();
        (total / TAU).round() as i32
    }

    /// Classifies `p` against the enclosed area, independent of orientation.
    /// Points within `eps` of the loop are reported as [`PointLocation::OnBoundary`].
    #[must_use]
    pub fn locate(&self, p: &Point2, eps: f64) -> PointLocation {
        if !self.bounds().inflated(eps).contains(p) {
            return PointLocation::Outside;
        }
        if self.distance_to(p) <= eps {
            return PointLocation::OnBoundary;
        }
        if self.winding_number(p) == 0 {
            PointLocation::Outside
        } else {
            PointLocation::Inside
        }
    }

    /// Minimum distance from `p` to the loop.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Index, parameter and distance of the segment closest to `p`.
    #[must_use]
    pub fn closest_segment(&self, p: &Point2) -> (usize, f64, f64) {
        let mut best = (0, 0.0, f64::INFINITY);
        for (i, s) in self.segments.iter().enumerate() {
            let d = s.distance_to(p);
            if d < best.2 {
                best = (i, s.closest_parameter(p), d);
            }
        }
        best
    }

    /// Border mapped through a homogeneous planar transform. A mirroring
    /// transform reverses the orientation of the result.
    #[must_use]
    pub fn transformed(&self, m: &Matrix3) -> Self {
        Self {
            segments: self.segments.iter().map(|s| s.transformed(m)).collect(),
        }
    }

    /// Drops segments shorter than `eps` and merges consecutive collinear lines
    /// and consecutive co-circular arcs.
    #[must_use]
    pub fn simplified(&self, eps: f64) -> Self {
        let mut segments: Vec<Segment> = self
            .segments
            .iter()
            .copied()
            .filter(|s| !s.is_degenerate(eps))
            .collect();
        if segments.len() < 2 {
            return self.clone();
        }
        snap_joints(&mut segments);

        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for seg in segments {
            if let Some(last) = merged.last_mut() {
                if let Some(joined) = merge_pair(last, &seg, eps) {
                    *last = joined;
                    continue;
                }
            }
            merged.push(seg);
        }
        // Seam between the last and first segment.
        while merged.len() > 2 {
            let n = merged.len();
            match merge_pair(&merged[n - 1], &merged[0], eps) {
                Some(joined) => {
                    merged[0] = joined;
                    merged.pop();
                }
                None => break,
            }
        }

        if merged.len() < 2 {
            return self.clone();
        }
        Self { segments: merged }
    }

    /// Flattens the loop to a polygon whose chords deviate from arcs by at most
    /// `tolerance`. The first point is not repeated at the end.
    #[must_use]
    pub fn to_points(&self, tolerance: f64) -> Vec<Point2> {
        let mut points = Vec::with_capacity(self.segments.len() * 2);
        for seg in &self.segments {
            points.push(seg.start_point());
            if let Some(g) = seg.arc_geometry() {
                let n_sub = arc_subdivision_count(g.radius, g.sweep.abs(), tolerance);
                for j in 1..n_sub {
                    points.push(seg.point_at(f64::from(j) / f64::from(n_sub)));
                }
            }
        }
        points
    }
}

/// Moves every segment start onto its predecessor's end.
fn snap_joints(segments: &mut [Segment]) {
    let n = segments.len();
    for i in 0..n {
        let next = (i + 1) % n;
        let joint = segments[i].end_point();
        let end = segments[next].end_point();
        segments[next] = segments[next].with_endpoints(joint, end);
    }
}

fn merge_pair(a: &Segment, b: &Segment, eps: f64) -> Option<Segment> {
    match (a, b) {
        (Segment::Line(_), Segment::Line(_)) => {
            let da = a.end_point() - a.start_point();
            let db = b.end_point() - b.start_point();
            let collinear = da.perp(&db).abs() <= eps * da.norm().max(db.norm());
            (collinear && da.dot(&db) > 0.0).then(|| Segment::line(a.start_point(), b.end_point()))
        }
        (Segment::Arc(x), Segment::Arc(y)) => {
            let (gx, gy) = (x.geometry(), y.geometry());
            let same_circle =
                (gx.center - gy.center).norm() <= eps && (gx.radius - gy.radius).abs() <= eps;
            let sweep = gx.sweep + gy.sweep;
            (same_circle && gx.sweep * gy.sweep > 0.0 && sweep.abs() < 1.5 * PI).then(|| {
                Segment::arc(a.start_point(), b.end_point(), (sweep / 4.0).tan())
            })
        }
        _ => None,
    }
}

/// Number of chords needed to approximate an arc within `tolerance`.
fn arc_subdivision_count(radius: f64, abs_sweep: f64, tolerance: f64) -> u32 {
    if radius < 1e-12 || abs_sweep < 1e-12 || tolerance <= 0.0 {
        return 1;
    }
    // Sagitta of a chord spanning θ is r * (1 - cos(θ/2)).
    let max_angle = if tolerance >= radius {
        PI
    } else {
        2.0 * (1.0 - tolerance / radius).acos()
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (abs_sweep / max_angle).ceil() as u32;
    n.max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector2;

    const TOL: f64 = 1e-9;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Border {
        Border::rectangle(p(0.0, 0.0), p(1.0, 1.0)).unwrap()
    }

    #[test]
    fn rectangle_is_ccw_with_area() {
        let sq = Border::rectangle(p(0.0, 0.0), p(4.0, 3.0)).unwrap();
        assert!(sq.is_ccw());
        assert!((sq.signed_area() - 12.0).abs() < TOL);
        assert!((sq.length() - 14.0).abs() < TOL);
        let cw = sq.reversed();
        assert!(!cw.is_ccw());
        assert!((cw.signed_area() + 12.0).abs() < TOL);
    }

    #[test]
    fn circle_area_and_bounds() {
        let c = Border::circle(p(1.0, 1.0), 2.0).unwrap();
        assert!((c.signed_area() - 4.0 * PI).abs() < TOL);
        let b = c.bounds();
        assert!((b.min.x + 1.0).abs() < TOL && (b.max.y - 3.0).abs() < TOL);
    }

    #[test]
    fn from_segments_rejects_open_chain() {
        let segs = vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
            Segment::line(p(1.0, 1.0), p(0.0, 0.5)),
        ];
        let err = Border::from_segments(segs, 1e-6).unwrap_err();
        assert!(err.to_string().contains("not closed"), "{err}");
    }

    #[test]
    fn from_segments_snaps_small_gaps() {
        let segs = vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 1e-7), p(1.0, 1.0)),
            Segment::line(p(1.0, 1.0), p(0.0, 0.0)),
        ];
        let b = Border::from_segments(segs, 1e-6).unwrap();
        for (i, s) in b.segments().iter().enumerate() {
            let next = &b.segments()[(i + 1) % b.segment_count()];
            assert_eq!(s.end_point(), next.start_point());
        }
    }

    #[test]
    fn locate_inside_boundary_outside() {
        let sq = unit_square();
        assert_eq!(sq.locate(&p(0.5, 0.5), 1e-9), PointLocation::Inside);
        assert_eq!(sq.locate(&p(1.0, 0.5), 1e-9), PointLocation::OnBoundary);
        assert_eq!(sq.locate(&p(1.5, 0.5), 1e-9), PointLocation::Outside);
        assert_eq!(sq.reversed().locate(&p(0.5, 0.5), 1e-9), PointLocation::Inside);
        assert_eq!(sq.winding_number(&p(0.5, 0.5)), 1);
        assert_eq!(sq.reversed().winding_number(&p(0.5, 0.5)), -1);
    }

    #[test]
    fn locate_with_arcs() {
        // Square with its bottom edge bulging outward.
        let b = Border::from_vertices(&[
            (p(0.0, 0.0), 1.0),
            (p(2.0, 0.0), 0.0),
            (p(2.0, 2.0), 0.0),
            (p(0.0, 2.0), 0.0),
        ])
        .unwrap();
        assert!((b.signed_area() - (4.0 + PI / 2.0)).abs() < TOL);
        assert_eq!(b.locate(&p(1.0, -0.5), 1e-9), PointLocation::Inside);
        assert_eq!(b.locate(&p(1.0, -1.5), 1e-9), PointLocation::Outside);
        assert_eq!(b.locate(&p(1.0, -1.0), 1e-9), PointLocation::OnBoundary);
    }

    #[test]
    fn simplified_merges_collinear_lines() {
        let b = Border::from_points(&[
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 2.0),
            p(0.0, 2.0),
            p(0.0, 1.0),
        ])
        .unwrap();
        let s = b.simplified(1e-9);
        assert_eq!(s.segment_count(), 4);
        assert!((s.area() - 4.0).abs() < TOL);
    }

    #[test]
    fn mirrored_border_flips_orientation() {
        let m = Matrix3::new_nonuniform_scaling(&Vector2::new(-1.0, 1.0));
        let t = unit_square().transformed(&m);
        assert!(!t.is_ccw());
        assert!((t.area() - 1.0).abs() < TOL);
    }

    #[test]
    fn to_points_flattens_arcs() {
        let c = Border::circle(p(0.0, 0.0), 1.0).unwrap();
        let pts = c.to_points(1e-3);
        assert!(pts.len() > 20);
        for q in &pts {
            assert!((q.coords.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn subdivision_count_tracks_tolerance() {
        assert!(arc_subdivision_count(1.0, PI, 10.0) <= 2);
        assert!(arc_subdivision_count(1.0, PI, 0.001) > 10);
    }
}
