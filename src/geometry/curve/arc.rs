use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_from_bulge, bulge_from_sweep, sub_bulge, ArcGeometry};
use crate::math::distance_2d::point_to_arc_dist;
use crate::math::{Point2, Rect2, Vector2, TOLERANCE};

use super::Curve2D;

/// A circular arc stored in bulge form.
///
/// The arc runs from `start` to `end`; `bulge = tan(sweep / 4)` where a
/// positive bulge turns counter-clockwise (the arc bulges to the right of the
/// chord). `|bulge| < 1` is a minor arc, `|bulge| = 1` a semicircle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSeg {
    start: Point2,
    end: Point2,
    bulge: f64,
}

impl ArcSeg {
    /// Creates an arc from its endpoints and bulge.
    #[must_use]
    pub fn new(start: Point2, end: Point2, bulge: f64) -> Self {
        Self { start, end, bulge }
    }

    /// Creates an arc from center form.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not positive or the sweep is zero or
    /// a full turn (a closed circle needs at least two arcs).
    pub fn from_center(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE || sweep.abs() >= TAU - TOLERANCE {
            return Err(GeometryError::Degenerate(format!("unsupported arc sweep {sweep}")).into());
        }
        let end_angle = start_angle + sweep;
        let start = center + Vector2::new(start_angle.cos(), start_angle.sin()) * radius;
        let end = center + Vector2::new(end_angle.cos(), end_angle.sin()) * radius;
        Ok(Self {
            start,
            end,
            bulge: bulge_from_sweep(sweep),
        })
    }

    #[must_use]
    pub fn bulge(&self) -> f64 {
        self.bulge
    }

    /// Center-radius-angle form of this arc.
    #[must_use]
    pub fn geometry(&self) -> ArcGeometry {
        arc_from_bulge(&self.start, &self.end, self.bulge)
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.geometry().center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.geometry().radius
    }

    /// Signed sweep angle, positive for counter-clockwise.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        4.0 * self.bulge.atan()
    }

    pub(crate) fn with_endpoints(self, start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            bulge: self.bulge,
        }
    }
}

impl Curve2D for ArcSeg {
    fn start_point(&self) -> Point2 {
        self.start
    }

    fn end_point(&self) -> Point2 {
        self.end
    }

    fn point_at(&self, t: f64) -> Point2 {
        if t <= 0.0 {
            self.start
        } else if t >= 1.0 {
            self.end
        } else {
            self.geometry().point_at(t)
        }
    }

    fn direction_at(&self, t: f64) -> Vector2 {
        let g = self.geometry();
        if g.radius < TOLERANCE {
            let d = self.end - self.start;
            let len = d.norm();
            return if len < TOLERANCE {
                Vector2::zeros()
            } else {
                d / len
            };
        }
        g.tangent_at(t)
    }

    fn length(&self) -> f64 {
        let g = self.geometry();
        if g.radius < TOLERANCE {
            (self.end - self.start).norm()
        } else {
            g.length()
        }
    }

    fn bounds(&self) -> Rect2 {
        let mut r = Rect2::from_point(self.start);
        r.include_point(&self.end);
        let g = self.geometry();
        if g.radius < TOLERANCE {
            return r;
        }
        // Axis extremes reached inside the sweep.
        for angle in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            if g.angle_to_param(angle).is_some() {
                r.include_point(&(g.center + Vector2::new(angle.cos(), angle.sin()) * g.radius));
            }
        }
        r
    }

    fn closest_parameter(&self, p: &Point2) -> f64 {
        let g = self.geometry();
        if g.radius < TOLERANCE {
            return 0.0;
        }
        g.closest_param(p)
    }

    fn distance_to(&self, p: &Point2) -> f64 {
        let g = self.geometry();
        if g.radius < TOLERANCE {
            return crate::math::distance_2d::point_to_segment_dist(p, &self.start, &self.end);
        }
        point_to_arc_dist(p, &g)
    }

    fn trim(&self, t0: f64, t1: f64) -> Self {
        Self {
            start: self.point_at(t0),
            end: self.point_at(t1),
            bulge: sub_bulge(self.bulge, t0, t1),
        }
    }

    fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            bulge: -self.bulge,
        }
    }
}
