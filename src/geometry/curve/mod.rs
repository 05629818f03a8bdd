mod arc;
mod line;
mod segment;

pub use arc::ArcSeg;
pub use line::LineSeg;
pub use segment::{CurveHit, Segment};

use crate::math::{Point2, Rect2, Vector2};

/// Trait for directed planar curve pieces parameterized over `[0, 1]`.
pub trait Curve2D {
    /// Point at parameter 0.
    fn start_point(&self) -> Point2;

    /// Point at parameter 1.
    fn end_point(&self) -> Point2;

    /// Evaluates the curve at parameter `t` in `[0, 1]`.
    fn point_at(&self, t: f64) -> Point2;

    /// Unit tangent at parameter `t`, or the zero vector for degenerate curves.
    fn direction_at(&self, t: f64) -> Vector2;

    /// Unit tangent leaving the start point.
    fn start_direction(&self) -> Vector2 {
        self.direction_at(0.0)
    }

    /// Unit tangent arriving at the end point.
    fn end_direction(&self) -> Vector2 {
        self.direction_at(1.0)
    }

    /// Arc length of the curve.
    fn length(&self) -> f64;

    /// Axis-aligned bounding rectangle.
    fn bounds(&self) -> Rect2;

    /// Parameter of the curve point nearest to `p`.
    fn closest_parameter(&self, p: &Point2) -> f64;

    /// Minimum distance from `p` to the curve.
    fn distance_to(&self, p: &Point2) -> f64 {
        (self.point_at(self.closest_parameter(p)) - p).norm()
    }

    /// Sub-curve over `[t0, t1]`. Passing `t0 > t1` yields a reversed piece.
    #[must_use]
    fn trim(&self, t0: f64, t1: f64) -> Self
    where
        Self: Sized;

    /// Splits the curve at `t`, returning the pieces before and after.
    #[must_use]
    fn split_at(&self, t: f64) -> (Self, Self)
    where
        Self: Sized,
    {
        (self.trim(0.0, t), self.trim(t, 1.0))
    }

    /// The same curve traversed in the opposite direction.
    #[must_use]
    fn reversed(&self) -> Self
    where
        Self: Sized;
}
