use crate::math::arc_2d::ArcGeometry;
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d,
};
use crate::math::{is_mirroring, Matrix3, Point2, Rect2, Vector2, TOLERANCE};

use super::{ArcSeg, Curve2D, LineSeg};

/// Bulge magnitude below which an arc is treated as a straight line.
const MIN_BULGE: f64 = 1e-12;

/// A single intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    pub point: Point2,
    /// Parameter on the segment `intersect` was called on.
    pub t_self: f64,
    /// Parameter on the other segment.
    pub t_other: f64,
}

/// A border piece: either a straight line or a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(LineSeg),
    Arc(ArcSeg),
}

impl Segment {
    #[must_use]
    pub fn line(start: Point2, end: Point2) -> Self {
        Self::Line(LineSeg::new(start, end))
    }

    /// Creates an arc segment, falling back to a line for a vanishing bulge.
    #[must_use]
    pub fn arc(start: Point2, end: Point2, bulge: f64) -> Self {
        if bulge.abs() < MIN_BULGE {
            Self::line(start, end)
        } else {
            Self::Arc(ArcSeg::new(start, end, bulge))
        }
    }

    /// Bulge of the segment; zero for lines.
    #[must_use]
    pub fn bulge(&self) -> f64 {
        match self {
            Self::Line(_) => 0.0,
            Self::Arc(a) => a.bulge(),
        }
    }

    #[must_use]
    pub fn is_arc(&self) -> bool {
        matches!(self, Self::Arc(_))
    }

    /// Returns `true` if the segment is shorter than `eps`.
    #[must_use]
    pub fn is_degenerate(&self, eps: f64) -> bool {
        self.length() < eps
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// Copy of the segment with its endpoints moved, keeping the bulge.
    #[must_use]
    pub fn with_endpoints(&self, start: Point2, end: Point2) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.with_endpoints(start, end)),
            Self::Arc(a) => Self::Arc(a.with_endpoints(start, end)),
        }
    }

    /// Center-radius form of the supporting circle, if this is an arc.
    #[must_use]
    pub fn arc_geometry(&self) -> Option<ArcGeometry> {
        match self {
            Self::Line(_) => None,
            Self::Arc(a) => Some(a.geometry()),
        }
    }

    /// All points where this segment meets `other`.
    ///
    /// Proper crossings come from the analytic solvers; endpoint touches within
    /// `eps` are added explicitly, which also reports the ends of collinear or
    /// co-circular overlaps. Hits closer than `eps` to each other are merged and
    /// the result is ordered along `self`.
    #[must_use]
    pub fn intersect(&self, other: &Segment, eps: f64) -> Vec<CurveHit> {
        let mut hits: Vec<CurveHit> = Vec::new();

        let push = |hit: CurveHit, hits: &mut Vec<CurveHit>| {
            if hits.iter().all(|h| (h.point - hit.point).norm() > eps) {
                hits.push(hit);
            }
        };

        // Endpoint touches first so that exact vertex positions win the dedup.
        for (t, p) in [(0.0, self.start_point()), (1.0, self.end_point())] {
            if other.distance_to(&p) <= eps {
                let t_other = other.closest_parameter(&p);
                push(CurveHit { point: p, t_self: t, t_other }, &mut hits);
            }
        }
        for (t, p) in [(0.0, other.start_point()), (1.0, other.end_point())] {
            if self.distance_to(&p) <= eps {
                let t_self = self.closest_parameter(&p);
                push(CurveHit { point: p, t_self, t_other: t }, &mut hits);
            }
        }

        for (point, t_self, t_other) in self.crossings(other) {
            push(CurveHit { point, t_self, t_other }, &mut hits);
        }

        hits.sort_by(|a, b| a.t_self.total_cmp(&b.t_self));
        hits
    }

    fn crossings(&self, other: &Segment) -> Vec<(Point2, f64, f64)> {
        match (self, other) {
            (Self::Line(a), Self::Line(b)) => segment_segment_intersect_2d(
                &a.start_point(),
                &a.end_point(),
                &b.start_point(),
                &b.end_point(),
            )
            .into_iter()
            .collect(),
            (Self::Line(a), Self::Arc(b)) => {
                line_arc_intersect_2d(&a.start_point(), &a.end_point(), &b.geometry())
            }
            (Self::Arc(a), Self::Line(b)) => {
                line_arc_intersect_2d(&b.start_point(), &b.end_point(), &a.geometry())
                    .into_iter()
                    .map(|(p, tb, ta)| (p, ta, tb))
                    .collect()
            }
            (Self::Arc(a), Self::Arc(b)) => arc_arc_intersect_2d(&a.geometry(), &b.geometry()),
        }
    }

    /// Parameters where this segment crosses the circle around `center`.
    #[must_use]
    pub fn intersect_circle(&self, center: &Point2, radius: f64) -> Vec<f64> {
        let circle = ArcGeometry::full_circle(*center, radius);
        let mut ts: Vec<f64> = match self {
            Self::Line(l) => line_arc_intersect_2d(&l.start_point(), &l.end_point(), &circle)
                .into_iter()
                .map(|(_, t, _)| t)
                .collect(),
            Self::Arc(a) => arc_arc_intersect_2d(&a.geometry(), &circle)
                .into_iter()
                .map(|(_, t, _)| t)
                .collect(),
        };
        ts.sort_by(f64::total_cmp);
        ts
    }

    /// This segment's term of the signed loop area: the shoelace term of the
    /// chord plus the signed circular-segment area for arcs.
    #[must_use]
    pub fn signed_area_contribution(&self) -> f64 {
        let a = self.start_point();
        let b = self.end_point();
        let chord = 0.5 * (a.x * b.y - b.x * a.y);
        match self {
            Self::Line(_) => chord,
            Self::Arc(arc) => {
                let g = arc.geometry();
                let theta = g.sweep.abs();
                let segment_area = 0.5 * g.radius * g.radius * (theta - theta.sin());
                chord + segment_area.copysign(g.sweep)
            }
        }
    }

    /// Angle subtended at `p`, used for winding numbers.
    pub(crate) fn winding_angle(&self, p: &Point2) -> f64 {
        let a = self.start_point() - p;
        let b = self.end_point() - p;
        let chord_angle = a.perp(&b).atan2(a.dot(&b));
        let Self::Arc(arc) = self else {
            return chord_angle;
        };
        let g = arc.geometry();
        if g.radius < TOLERANCE {
            return chord_angle;
        }
        // Inside the circular segment between chord and arc the arc winds a
        // full extra turn around `p`.
        let chord_vec = self.end_point() - self.start_point();
        let side = chord_vec.perp(&(p - self.start_point()));
        let inside_circle = (p - g.center).norm() < g.radius;
        if inside_circle && side * arc.bulge() < 0.0 {
            chord_angle + std::f64::consts::TAU.copysign(arc.bulge())
        } else {
            chord_angle
        }
    }

    /// Segment mapped through a homogeneous planar transform. Mirroring
    /// transforms flip the arc's turning sense.
    #[must_use]
    pub fn transformed(&self, m: &Matrix3) -> Self {
        let start = m.transform_point(&self.start_point());
        let end = m.transform_point(&self.end_point());
        match self {
            Self::Line(_) => Self::line(start, end),
            Self::Arc(a) => {
                let bulge = if is_mirroring(m) { -a.bulge() } else { a.bulge() };
                Self::Arc(ArcSeg::new(start, end, bulge))
            }
        }
    }
}

impl Curve2D for Segment {
    fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.start_point(),
            Self::Arc(a) => a.start_point(),
        }
    }

    fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => l.end_point(),
            Self::Arc(a) => a.end_point(),
        }
    }

    fn point_at(&self, t: f64) -> Point2 {
        match self {
            Self::Line(l) => l.point_at(t),
            Self::Arc(a) => a.point_at(t),
        }
    }

    fn direction_at(&self, t: f64) -> Vector2 {
        match self {
            Self::Line(l) => l.direction_at(t),
            Self::Arc(a) => a.direction_at(t),
        }
    }

    fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
        }
    }

    fn bounds(&self) -> Rect2 {
        match self {
            Self::Line(l) => l.bounds(),
            Self::Arc(a) => a.bounds(),
        }
    }

    fn closest_parameter(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => l.closest_parameter(p),
            Self::Arc(a) => a.closest_parameter(p),
        }
    }

    fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => l.distance_to(p),
            Self::Arc(a) => a.distance_to(p),
        }
    }

    fn trim(&self, t0: f64, t1: f64) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.trim(t0, t1)),
            Self::Arc(a) => Self::Arc(a.trim(t0, t1)),
        }
    }

    fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
        }
    }
}

impl From<LineSeg> for Segment {
    fn from(l: LineSeg) -> Self {
        Self::Line(l)
    }
}

impl From<ArcSeg> for Segment {
    fn from(a: ArcSeg) -> Self {
        Self::Arc(a)
    }
}
