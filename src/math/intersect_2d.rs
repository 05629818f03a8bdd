use super::arc_2d::ArcGeometry;
use super::{Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let d = p2 - p1;
    let t = d.perp(d2) / cross;
    let u = d.perp(d1) / cross;
    Some((t, u))
}

/// Bounded segment-segment intersection in 2D.
///
/// Returns `(intersection_point, t, u)` where `t` and `u` are in `[0, 1]`.
/// Parallel (including collinear) segments report no crossing.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<(Point2, f64, f64)> {
    let da = a1 - a0;
    let db = b1 - b0;

    // Scale-aware parallel test on the unit directions.
    let la = da.norm();
    let lb = db.norm();
    if la < TOLERANCE || lb < TOLERANCE {
        return None;
    }
    let cross = da.perp(&db);
    if (cross / (la * lb)).abs() < TOLERANCE {
        return None;
    }

    let d = b0 - a0;
    let t = d.perp(&db) / cross;
    let u = d.perp(&da) / cross;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t_clamped = t.clamp(0.0, 1.0);
        Some((a0 + da * t_clamped, t_clamped, u.clamp(0.0, 1.0)))
    } else {
        None
    }
}

/// Intersection of the line segment `a0 → a1` with a circular arc.
///
/// Returns `(point, t_seg, t_arc)` triples with both parameters in `[0, 1]`.
#[must_use]
pub fn line_arc_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    arc: &ArcGeometry,
) -> Vec<(Point2, f64, f64)> {
    let mut results = Vec::new();
    if arc.radius < TOLERANCE || arc.sweep.abs() < TOLERANCE {
        return results;
    }

    let d = a1 - a0;
    let seg_len_sq = d.norm_squared();
    if seg_len_sq < TOLERANCE * TOLERANCE {
        return results;
    }

    // Substitute parametric line into circle equation:
    // |a0 + t*d - c|² = r²
    let f = a0 - arc.center;
    let a = seg_len_sq;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - arc.radius * arc.radius;
    let discriminant = b * b - 4.0 * a * c;

    // Discriminant tolerance relative to the quadratic's scale.
    let disc_tol = TOLERANCE * (b * b).max(a * arc.radius * arc.radius);
    if discriminant < -disc_tol {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let t_roots = if disc_sqrt <= disc_tol.sqrt() {
        // Tangent case: single root.
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    let eps = TOLERANCE;
    for t_seg in t_roots {
        if t_seg < -eps || t_seg > 1.0 + eps {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);
        let p = a0 + d * t_seg;
        let angle = (p.y - arc.center.y).atan2(p.x - arc.center.x);
        if let Some(t_arc) = arc.angle_to_param(angle) {
            results.push((p, t_seg, t_arc));
        }
    }

    results
}

/// Intersection of two circular arcs.
///
/// Returns `(point, t1, t2)` triples with arc parameters in `[0, 1]`.
/// Concentric arcs report nothing; overlaps are detected by endpoint tests
/// in the caller.
#[must_use]
pub fn arc_arc_intersect_2d(arc1: &ArcGeometry, arc2: &ArcGeometry) -> Vec<(Point2, f64, f64)> {
    let mut results = Vec::new();
    let (r1, r2) = (arc1.radius, arc2.radius);
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return results;
    }

    let dc = arc2.center - arc1.center;
    let dist_sq = dc.norm_squared();
    let dist = dist_sq.sqrt();
    if dist < TOLERANCE {
        return results;
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    let scale_tol = TOLERANCE * sum.max(1.0);
    if dist > sum + scale_tol || dist < diff - scale_tol {
        return results;
    }

    // Distance from c1 along c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();

    let axis = dc / dist;
    let mid = arc1.center + axis * a;
    let perp = Vector2::new(-axis.y, axis.x);

    let candidates = if h < scale_tol {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    };

    for p in candidates {
        let angle1 = (p.y - arc1.center.y).atan2(p.x - arc1.center.x);
        let angle2 = (p.y - arc2.center.y).atan2(p.x - arc2.center.x);
        if let (Some(t1), Some(t2)) = (arc1.angle_to_param(angle1), arc2.angle_to_param(angle2)) {
            results.push((p, t1, t2));
        }
    }

    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn arc(cx: f64, cy: f64, r: f64, start: f64, sweep: f64) -> ArcGeometry {
        ArcGeometry {
            center: Point2::new(cx, cy),
            radius: r,
            start_angle: start,
            sweep,
        }
    }

    #[test]
    fn line_line_perpendicular() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.5, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        assert!(line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn segment_segment_crossing() {
        let (pt, t, u) = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((pt.x - 1.0).abs() < TOLERANCE && (pt.y - 1.0).abs() < TOLERANCE);
        assert!((t - 0.5).abs() < TOLERANCE && (u - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_collinear_is_none() {
        assert!(segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(3.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn line_arc_two_crossings() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-2.0, 0.0),
            &Point2::new(2.0, 0.0),
            &arc(0.0, 0.0, 1.0, 0.0, PI),
        );
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn line_arc_tangent_single_hit() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-1.0, 1.0),
            &Point2::new(1.0, 1.0),
            &arc(0.0, 0.0, 1.0, 0.0, PI),
        );
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(hits[0].0.x.abs() < 1e-6);
        assert!((hits[0].2 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn line_arc_outside_angular_range() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-2.0, 0.0),
            &Point2::new(2.0, 0.0),
            &arc(0.0, 0.0, 1.0, PI / 4.0, PI / 4.0),
        );
        assert!(hits.is_empty(), "hits={hits:?}");
    }

    #[test]
    fn arc_arc_two_crossings() {
        let hits = arc_arc_intersect_2d(
            &ArcGeometry::full_circle(Point2::new(0.0, 0.0), 1.0),
            &ArcGeometry::full_circle(Point2::new(1.0, 0.0), 1.0),
        );
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        let s = 3.0_f64.sqrt() / 2.0;
        let mut ys: Vec<f64> = hits.iter().map(|h| h.0.y).collect();
        ys.sort_by(f64::total_cmp);
        assert!((ys[0] + s).abs() < 1e-9 && (ys[1] - s).abs() < 1e-9);
    }

    #[test]
    fn arc_arc_tangent() {
        let hits = arc_arc_intersect_2d(
            &arc(0.0, 0.0, 1.0, -PI / 4.0, PI / 2.0),
            &arc(2.0, 0.0, 1.0, PI / 2.0, PI),
        );
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!((hits[0].0.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn arc_arc_far_apart() {
        let hits = arc_arc_intersect_2d(
            &arc(0.0, 0.0, 1.0, 0.0, PI),
            &arc(5.0, 0.0, 1.0, 0.0, PI),
        );
        assert!(hits.is_empty());
    }
}
