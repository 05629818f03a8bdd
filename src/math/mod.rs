pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
mod rect;
pub(crate) mod spatial;

pub use rect::Rect2;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Homogeneous 3x3 matrix for planar rigid and mirror transforms.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Geometric tolerance used inside the low-level curve primitives.
pub const TOLERANCE: f64 = 1e-10;

/// Machine-epsilon-scale threshold for signed-area orientation tests.
pub const ORIENTATION_EPS: f64 = 8.0 * f64::EPSILON;

/// Normalizes an angle to `[0, 2π)`.
#[must_use]
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(std::f64::consts::TAU);
    if r >= std::f64::consts::TAU {
        0.0
    } else {
        r
    }
}

/// Returns `true` if the transform flips orientation (negative determinant of
/// its linear part).
#[must_use]
pub fn is_mirroring(m: &Matrix3) -> bool {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    det < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn normalize_angle_wraps_negative() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < TOLERANCE);
        assert!(normalize_angle(TAU).abs() < TOLERANCE);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-9);
    }

    #[test]
    fn mirror_detection() {
        let mirror = Matrix3::new_nonuniform_scaling(&Vector2::new(-1.0, 1.0));
        assert!(is_mirroring(&mirror));
        assert!(!is_mirroring(&Matrix3::new_rotation(0.3)));
    }
}
