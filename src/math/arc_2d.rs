/// 2D arc/bulge math utilities.
///
/// Bulge convention: `bulge = tan(sweep_angle / 4)`.
/// - `bulge = 0`: straight line
/// - `bulge > 0`: counter-clockwise arc (bulges to the right of the chord)
/// - `bulge < 0`: clockwise arc
/// - `|bulge| = 1`: semicircle
use std::f64::consts::{PI, TAU};

use super::{Point2, Vector2, TOLERANCE};

/// Center-radius-angle form of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub center: Point2,
    pub radius: f64,
    /// Angle of the start point as seen from the center.
    pub start_angle: f64,
    /// Signed sweep, positive for counter-clockwise.
    pub sweep: f64,
}

impl ArcGeometry {
    /// A full counter-clockwise circle starting at angle zero.
    #[must_use]
    pub fn full_circle(center: Point2, radius: f64) -> Self {
        Self {
            center,
            radius,
            start_angle: 0.0,
            sweep: TAU,
        }
    }

    /// Evaluates the arc at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Unit tangent at parameter `t`, pointing in the direction of increasing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }

    /// Arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
    ///
    /// Returns `None` if the angle is not within the arc's angular range.
    #[must_use]
    pub fn angle_to_param(&self, angle: f64) -> Option<f64> {
        let eps = TOLERANCE * 100.0;
        let mut delta = angle - self.start_angle;

        if self.sweep > 0.0 {
            while delta < -eps {
                delta += TAU;
            }
            while delta > TAU + eps {
                delta -= TAU;
            }
        } else {
            while delta > eps {
                delta -= TAU;
            }
            while delta < -TAU - eps {
                delta += TAU;
            }
        }

        let t = delta / self.sweep;
        if t >= -eps && t <= 1.0 + eps {
            Some(t.clamp(0.0, 1.0))
        } else {
            None
        }
    }

    /// Parameter of the point on the arc nearest to `p`.
    #[must_use]
    pub fn closest_param(&self, p: &Point2) -> f64 {
        let d = p - self.center;
        if d.norm() < TOLERANCE {
            return 0.0;
        }
        if let Some(t) = self.angle_to_param(d.y.atan2(d.x)) {
            return t;
        }
        let d0 = (self.point_at(0.0) - p).norm();
        let d1 = (self.point_at(1.0) - p).norm();
        if d0 <= d1 {
            0.0
        } else {
            1.0
        }
    }
}

/// Converts a bulge-defined arc segment to center-radius-angle form.
///
/// Returns a zero-radius geometry for zero-length chords.
#[must_use]
pub fn arc_from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> ArcGeometry {
    let chord = p1 - p0;
    let chord_len = chord.norm();

    if chord_len < 1e-12 || bulge.abs() < 1e-12 {
        return ArcGeometry {
            center: *p0,
            radius: 0.0,
            start_angle: 0.0,
            sweep: 0.0,
        };
    }

    // Signed distance from chord midpoint to center, along the left normal.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = nalgebra::center(p0, p1);
    let normal = Vector2::new(-chord.y, chord.x) / chord_len;
    let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

    // r = d*(1+b²)/(4*|b|) derived from r = d/(2*sin(θ/2)) with θ=4*atan(b)
    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);

    let sweep = 4.0 * bulge.atan();
    let sweep = if sweep > TAU {
        sweep - TAU
    } else if sweep < -TAU {
        sweep + TAU
    } else {
        sweep
    };

    ArcGeometry {
        center,
        radius,
        start_angle,
        sweep,
    }
}

/// Bulge of an arc with the given signed sweep.
#[must_use]
pub fn bulge_from_sweep(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// Bulge of the arc from `p0` to `p1` around `center`, turning counter-clockwise
/// when `is_ccw` is set.
#[must_use]
pub fn bulge_from_center(p0: &Point2, p1: &Point2, center: &Point2, is_ccw: bool) -> f64 {
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);
    let end_angle = (p1.y - center.y).atan2(p1.x - center.x);

    let mut sweep = end_angle - start_angle;
    if is_ccw {
        if sweep < 0.0 {
            sweep += 2.0 * PI;
        }
    } else if sweep > 0.0 {
        sweep -= 2.0 * PI;
    }

    bulge_from_sweep(sweep)
}

/// Bulge of the sub-arc spanning `[t_start, t_end]` of an arc with `bulge`.
#[must_use]
pub fn sub_bulge(bulge: f64, t_start: f64, t_end: f64) -> f64 {
    if bulge.abs() < 1e-12 {
        return 0.0;
    }
    let sweep = 4.0 * bulge.atan();
    bulge_from_sweep(sweep * (t_end - t_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn semicircle_ccw_goes_through_bottom() {
        // CCW semicircle from (0,0) to (2,0): center (1,0), passes (1,-1).
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0);
        assert!((arc.center.x - 1.0).abs() < TOL);
        assert!(arc.center.y.abs() < TOL);
        assert!((arc.radius - 1.0).abs() < TOL);
        assert!((arc.sweep - PI).abs() < TOL);

        let end = arc.point_at(1.0);
        assert!((end.x - 2.0).abs() < TOL && end.y.abs() < TOL);
        let mid = arc.point_at(0.5);
        assert!((mid.x - 1.0).abs() < TOL && (mid.y + 1.0).abs() < TOL);
    }

    #[test]
    fn semicircle_cw_goes_through_top() {
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), -1.0);
        assert!((arc.sweep + PI).abs() < TOL);
        let mid = arc.point_at(0.5);
        assert!((mid.x - 1.0).abs() < TOL && (mid.y - 1.0).abs() < TOL);
    }

    #[test]
    fn quarter_circle_center() {
        let bulge = (PI / 8.0).tan();
        let arc = arc_from_bulge(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), bulge);
        assert!(arc.center.coords.norm() < 1e-9);
        assert!((arc.radius - 1.0).abs() < 1e-9);
        assert!((arc.sweep - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn bulge_from_center_roundtrip() {
        let p0 = Point2::new(0.0, 0.0);
        let p1 = Point2::new(2.0, 0.0);
        let arc = arc_from_bulge(&p0, &p1, 1.0);
        let b = bulge_from_center(&p0, &p1, &arc.center, true);
        assert!((b - 1.0).abs() < TOL, "bulge={b}");
        let b_cw = bulge_from_center(&p0, &p1, &arc.center, false);
        assert!((b_cw + 1.0).abs() < TOL, "bulge={b_cw}");
    }

    #[test]
    fn tangent_is_unit_and_follows_sweep() {
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0);
        let t0 = arc.tangent_at(0.0);
        assert!((t0.norm() - 1.0).abs() < TOL);
        assert!(t0.x.abs() < TOL && (t0.y + 1.0).abs() < TOL);
    }

    #[test]
    fn angle_param_outside_range() {
        let arc = ArcGeometry {
            center: Point2::origin(),
            radius: 1.0,
            start_angle: 0.0,
            sweep: PI / 2.0,
        };
        assert!(arc.angle_to_param(PI).is_none());
        let t = arc.angle_to_param(PI / 4.0).unwrap_or(-1.0);
        assert!((t - 0.5).abs() < TOL);
    }

    #[test]
    fn sub_bulge_halves_semicircle() {
        let half = sub_bulge(1.0, 0.0, 0.5);
        assert!((half - (PI / 8.0).tan()).abs() < TOL);
        assert!(sub_bulge(0.0, 0.2, 0.7).abs() < TOL);
    }
}
