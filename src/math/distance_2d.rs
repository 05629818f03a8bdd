use super::arc_2d::ArcGeometry;
use super::Point2;

/// Returns the minimum distance from `p` to the line segment `a → b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        return (p - a).norm();
    }

    // Project onto the infinite line, clamp to the segment.
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to the center) falls within the arc range,
/// the distance is `||p - center| - radius|`; otherwise it is the distance to
/// the nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, arc: &ArcGeometry) -> f64 {
    let d = p - arc.center;
    let dist_to_center = d.norm();

    if arc.angle_to_param(d.y.atan2(d.x)).is_some() {
        return (dist_to_center - arc.radius).abs();
    }

    let d0 = (p - arc.point_at(0.0)).norm();
    let d1 = (p - arc.point_at(1.0)).norm();
    d0.min(d1)
}
