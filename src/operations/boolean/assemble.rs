use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Border, Curve2D, Segment};
use crate::math::spatial::BoxIndex;
use crate::math::{normalize_angle, Point2, Vector2};

/// Stitches kept pieces into closed loops by matching endpoints.
///
/// Piece start points are indexed; a walk follows end point to start point
/// until it returns to its origin. Where several unused pieces leave a
/// junction, the walk turns as far left as possible so that loops meeting at
/// a single point come out as separate borders. Chains that cannot be closed
/// are logged and dropped.
///
/// # Errors
///
/// Returns an error if the spatial index cannot be built.
pub fn stitch_loops(pieces: &[Segment], join_eps: f64) -> Result<Vec<Border>> {
    if pieces.is_empty() {
        return Ok(Vec::new());
    }

    let starts: Vec<Point2> = pieces.iter().map(Curve2D::start_point).collect();
    let index = BoxIndex::around_points(&starts, join_eps)?;
    let mut used = vec![false; pieces.len()];
    let mut loops = Vec::new();
    let mut open_chains = 0usize;

    for first in 0..pieces.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let origin = starts[first];
        let mut chain = vec![pieces[first]];
        let mut tail = pieces[first];
        let mut closed = false;

        // Every step consumes one piece, so the walk is bounded by the piece count.
        for _ in 0..pieces.len() {
            let end = tail.end_point();
            if (end - origin).norm() <= join_eps {
                closed = true;
                break;
            }
            let candidates: Vec<usize> = index
                .query_point(&end, join_eps)
                .into_iter()
                .filter(|&i| !used[i] && (starts[i] - end).norm() <= join_eps)
                .collect();
            let Some(next) = pick_leftmost(&tail.end_direction(), &candidates, pieces) else {
                break;
            };
            used[next] = true;
            tail = pieces[next];
            chain.push(tail);
        }

        if !closed {
            open_chains += 1;
            continue;
        }
        match Border::from_segments(chain, join_eps) {
            Ok(border) => loops.push(border),
            Err(e) => debug!("dropping degenerate stitched loop: {e}"),
        }
    }

    if open_chains > 0 {
        warn!(open_chains, "stitching left open chains");
    }
    Ok(loops)
}

/// Among `candidates`, picks the piece whose start tangent makes the largest
/// counter-clockwise angle from the reversed incoming tangent.
fn pick_leftmost(incoming: &Vector2, candidates: &[usize], pieces: &[Segment]) -> Option<usize> {
    let reverse_angle = (-incoming.y).atan2(-incoming.x);
    candidates
        .iter()
        .map(|&i| {
            let d = pieces[i].start_direction();
            let mut delta = normalize_angle(d.y.atan2(d.x) - reverse_angle);
            // Going straight back is the last resort.
            if delta > std::f64::consts::TAU - 1e-9 {
                delta = 0.0;
            }
            (i, delta)
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_edges(x0: f64, y0: f64, s: f64) -> Vec<Segment> {
        let c = [p(x0, y0), p(x0 + s, y0), p(x0 + s, y0 + s), p(x0, y0 + s)];
        (0..4).map(|i| Segment::line(c[i], c[(i + 1) % 4])).collect()
    }

    #[test]
    fn stitches_shuffled_square() {
        let mut edges = square_edges(0.0, 0.0, 1.0);
        edges.swap(0, 2);
        let loops = stitch_loops(&edges, 1e-9).unwrap();
        assert_eq!(loops.len(), 1);
        assert!((loops[0].signed_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn corner_touching_squares_stay_separate() {
        let mut edges = square_edges(0.0, 0.0, 1.0);
        edges.extend(square_edges(1.0, 1.0, 1.0));
        let loops = stitch_loops(&edges, 1e-9).unwrap();
        assert_eq!(loops.len(), 2);
        for l in &loops {
            assert!((l.signed_area() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn open_chain_is_dropped() {
        let edges = vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
        ];
        assert!(stitch_loops(&edges, 1e-9).unwrap().is_empty());
    }
}
