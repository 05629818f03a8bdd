use crate::error::{GeometryError, Result};
use crate::math::{Point2, Rect2, Vector2, TOLERANCE};

use super::Curve2D;

/// A bounded straight segment from `start` to `end`.
///
/// The parametric form is `P(t) = start + t * (end - start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSeg {
    start: Point2,
    end: Point2,
}

impl LineSeg {
    /// Creates a segment between two points. Zero-length segments are allowed
    /// here so that raw input can be carried around and filtered later.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Creates a segment, rejecting zero-length input.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroLength`] if both points coincide.
    pub fn try_new(start: Point2, end: Point2) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroLength.into());
        }
        Ok(Self { start, end })
    }

    /// The chord vector `end - start`.
    #[must_use]
    pub fn delta(&self) -> Vector2 {
        self.end - self.start
    }

    pub(crate) fn with_endpoints(self, start: Point2, end: Point2) -> Self {
        Self { start, end }
    }
}

impl Curve2D for LineSeg {
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
            self.start + self.delta() * t
        }
    }

    fn direction_at(&self, _t: f64) -> Vector2 {
        let d = self.delta();
        let len = d.norm();
        if len < TOLERANCE {
            Vector2::zeros()
        } else {
            d / len
        }
    }

    fn length(&self) -> f64 {
        self.delta().norm()
    }

    fn bounds(&self) -> Rect2 {
        let mut r = Rect2::from_point(self.start);
        r.include_point(&self.end);
        r
    }

    fn closest_parameter(&self, p: &Point2) -> f64 {
        let d = self.delta();
        let len_sq = d.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return 0.0;
        }
        ((p - self.start).dot(&d) / len_sq).clamp(0.0, 1.0)
    }

    fn distance_to(&self, p: &Point2) -> f64 {
        crate::math::distance_2d::point_to_segment_dist(p, &self.start, &self.end)
    }

    fn trim(&self, t0: f64, t1: f64) -> Self {
        Self::new(self.point_at(t0), self.point_at(t1))
    }

    fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_and_direction() {
        let l = LineSeg::new(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0));
        assert!((l.length() - 5.0).abs() < TOLERANCE);
        let mid = l.point_at(0.5);
        assert!((mid.x - 2.5).abs() < TOLERANCE && (mid.y - 3.0).abs() < TOLERANCE);
        let d = l.start_direction();
        assert!((d.x - 0.6).abs() < TOLERANCE && (d.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn try_new_rejects_zero_length() {
        let p = Point2::new(2.0, 2.0);
        assert!(LineSeg::try_new(p, p).is_err());
        assert!(LineSeg::try_new(p, Point2::new(3.0, 2.0)).is_ok());
    }

    #[test]
    fn split_keeps_exact_endpoints() {
        let l = LineSeg::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let (a, b) = l.split_at(0.3);
        assert_eq!(a.start_point(), l.start_point());
        assert_eq!(b.end_point(), l.end_point());
        assert_eq!(a.end_point(), b.start_point());
        assert!((a.length() - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn closest_parameter_clamps() {
        let l = LineSeg::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        assert!((l.closest_parameter(&Point2::new(1.0, 5.0)) - 0.5).abs() < TOLERANCE);
        assert!(l.closest_parameter(&Point2::new(-3.0, 0.0)).abs() < TOLERANCE);
        assert!((l.distance_to(&Point2::new(3.0, 0.0)) - 1.0).abs() < TOLERANCE);
    }
}
