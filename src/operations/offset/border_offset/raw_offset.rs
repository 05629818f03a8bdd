use std::f64::consts::PI;

use crate::geometry::{Border, Curve2D, Segment};
use crate::math::arc_2d::bulge_from_sweep;
use crate::math::{Point2, Vector2};

/// Builds the raw offset loop of `border`: every segment moved `distance` to
/// its left, consecutive results joined at the original vertices.
///
/// Where the offset side opens a gap, the join is a round arc about the
/// original vertex; where the offsets overlap, a straight connector is used
/// and the resulting self-crossings are removed later. Arcs whose radius
/// would collapse are dropped and bridged with a connector.
pub fn build(border: &Border, distance: f64, eps: f64) -> Vec<Segment> {
    let segments = border.segments();
    let offsets: Vec<Option<Segment>> = segments
        .iter()
        .map(|s| offset_segment(s, distance, eps))
        .collect();

    let n = segments.len();
    let mut raw: Vec<Segment> = Vec::with_capacity(n * 2);
    for i in 0..n {
        let Some(current) = offsets[i] else {
            continue;
        };
        raw.push(current);

        // Next surviving offset segment, and whether any collapsed in between.
        let mut j = (i + 1) % n;
        let mut bridged = false;
        while offsets[j].is_none() && j != i {
            bridged = true;
            j = (j + 1) % n;
        }
        let Some(next) = offsets[j] else {
            continue;
        };

        let from = current.end_point();
        let to = next.start_point();
        if (to - from).norm() <= eps {
            continue;
        }
        if bridged {
            raw.push(Segment::line(from, to));
            continue;
        }

        let turn = turn_angle(&segments[i].end_direction(), &segments[(i + 1) % n].start_direction());
        if turn * distance < 0.0 || (turn.abs() > PI - 1e-9 && turn.abs() <= PI) {
            let sweep = if turn.abs() > PI - 1e-9 {
                -PI * distance.signum()
            } else {
                turn
            };
            raw.push(Segment::arc(from, to, bulge_from_sweep(sweep)));
        } else {
            raw.push(Segment::line(from, to));
        }
    }

    snap_chain(&mut raw);
    raw
}

/// Moves a single segment `distance` to its left. Returns `None` if an arc
/// shrinks to (or through) its center.
fn offset_segment(seg: &Segment, distance: f64, eps: f64) -> Option<Segment> {
    match seg {
        Segment::Line(_) => {
            let d = seg.start_direction();
            let normal = Vector2::new(-d.y, d.x) * distance;
            Some(Segment::line(seg.start_point() + normal, seg.end_point() + normal))
        }
        Segment::Arc(arc) => {
            let g = arc.geometry();
            // The left side of a counter-clockwise arc faces its center.
            let new_radius = if arc.bulge() > 0.0 {
                g.radius - distance
            } else {
                g.radius + distance
            };
            if new_radius <= eps {
                return None;
            }
            let scale = new_radius / g.radius;
            let move_out = |p: Point2| g.center + (p - g.center) * scale;
            Some(Segment::arc(
                move_out(seg.start_point()),
                move_out(seg.end_point()),
                arc.bulge(),
            ))
        }
    }
}

/// Signed turn from direction `a` to direction `b`, in `(-π, π]`.
fn turn_angle(a: &Vector2, b: &Vector2) -> f64 {
    a.perp(b).atan2(a.dot(b))
}

fn snap_chain(segments: &mut [Segment]) {
    let n = segments.len();
    for i in 0..n {
        let next = (i + 1) % n;
        let joint = segments[i].end_point();
        segments[next] = segments[next].with_endpoints(joint, segments[next].end_point());
    }
}
