use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{Border, Curve2D, Segment};
use crate::math::{ORIENTATION_EPS, TOLERANCE};

use super::cluster::ClusterId;
use super::joint::{JointId, OrientedJoint};
use super::CurveGraph;

/// Traversal marks per joint: `[forward, backward]`.
type Consumed = SecondaryMap<JointId, [bool; 2]>;

fn is_consumed(consumed: &Consumed, step: OrientedJoint) -> bool {
    consumed
        .get(step.joint)
        .is_some_and(|m| m[usize::from(!step.forward)])
}

fn mark(consumed: &mut Consumed, step: OrientedJoint) {
    if let Some(entry) = consumed.entry(step.joint) {
        entry.or_insert([false; 2])[usize::from(!step.forward)] = true;
    }
}

impl CurveGraph {
    /// Walks every unused joint direction into a closed loop, turning as far
    /// left as possible at each cluster.
    ///
    /// Loops with positive area are bounded faces; loops with negative area
    /// run around a connected component. A walk that hits a malformed joint
    /// or finds no continuation is abandoned without affecting the others.
    pub(super) fn extract_loops(&self) -> Vec<Border> {
        let mut consumed = Consumed::new();
        let mut loops = Vec::new();
        let mut aborted = 0usize;

        for (id, joint) in &self.joints {
            if joint.detached {
                continue;
            }
            for forward in [true, false] {
                let start = OrientedJoint::new(id, forward);
                if is_consumed(&consumed, start) {
                    continue;
                }
                match self.walk_from(start, &mut consumed) {
                    Ok(found) => loops.extend(found),
                    Err(e) => {
                        aborted += 1;
                        debug!("loop extraction aborted: {e}");
                    }
                }
            }
        }

        if aborted > 0 {
            debug!(aborted, extracted = loops.len(), "loop extraction finished with aborts");
        }
        loops
    }

    /// Follows one loop starting with `start` until it returns to the
    /// cluster it left from.
    ///
    /// A walk that passes a cluster twice is pinched there; the part between
    /// the two visits is closed as its own loop, so the result does not depend
    /// on where the walk started. Loops with no area are dropped.
    fn walk_from(&self, start: OrientedJoint, consumed: &mut Consumed) -> Result<Vec<Border>> {
        let mut step = start;
        let mut segments: Vec<Segment> = Vec::new();
        // Cluster each segment leaves from.
        let mut path: Vec<ClusterId> = Vec::new();
        let mut loops = Vec::new();

        for _ in 0..=2 * self.joints.len() {
            mark(consumed, step);
            let joint = self.joint(step.joint)?;
            if joint.length() <= TOLERANCE {
                return Err(TopologyError::MalformedLoop("zero-length fragment".into()).into());
            }

            let (from, to) = if step.forward {
                (joint.start, joint.end)
            } else {
                (joint.end, joint.start)
            };
            let oriented = if step.forward {
                joint.segment
            } else {
                joint.segment.reversed()
            };
            segments.push(oriented.with_endpoints(self.cluster(from)?.position, self.cluster(to)?.position));
            path.push(from);

            if let Some(k) = path.iter().position(|&c| c == to) {
                loops.extend(self.close_loop(segments.split_off(k)));
                path.truncate(k);
                if k == 0 {
                    return Ok(loops);
                }
            }

            let arrival = self.cluster(to)?;
            let n = arrival.ends.len();
            let here = arrival
                .ends
                .iter()
                .position(|&e| e == step.arrival())
                .ok_or_else(|| TopologyError::MalformedLoop("arrival joint not registered".into()))?;
            if n < 2 {
                return Err(TopologyError::MalformedLoop("no continuation joint".into()).into());
            }

            // The end preceding the arrival in counter-clockwise order is the
            // leftmost turn.
            let next = OrientedJoint::leaving(arrival.ends[(here + n - 1) % n]);
            if is_consumed(consumed, next) {
                return Err(TopologyError::MalformedLoop("walk re-entered a used joint".into()).into());
            }
            step = next;
        }
        Err(TopologyError::MalformedLoop("walk did not close".into()).into())
    }

    fn close_loop(&self, segments: Vec<Segment>) -> Option<Border> {
        let border = match Border::from_segments(segments, self.params.cluster_size) {
            Ok(b) => b,
            Err(e) => {
                debug!("discarding degenerate loop: {e}");
                return None;
            }
        };
        let diagonal = border.bounds().diagonal();
        if border.area() <= ORIENTATION_EPS * diagonal * diagonal {
            return None;
        }
        Some(border)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::TopologyParams;
    use super::*;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn square_gives_face_and_boundary() {
        let frags = vec![
            Segment::line(p(0.0, 0.0), p(2.0, 0.0)),
            Segment::line(p(2.0, 2.0), p(2.0, 0.0)),
            Segment::line(p(0.0, 2.0), p(2.0, 2.0)),
            Segment::line(p(0.0, 0.0), p(0.0, 2.0)),
        ];
        let g = CurveGraph::new(frags, TopologyParams::new(1e-3)).unwrap();
        let loops = g.extracted_loops();
        assert_eq!(loops.len(), 2);
        let areas: Vec<f64> = loops.iter().map(Border::signed_area).collect();
        assert!(areas.iter().any(|a| (a - 4.0).abs() < 1e-12));
        assert!(areas.iter().any(|a| (a + 4.0).abs() < 1e-12));
    }

    #[test]
    fn divided_square_has_two_faces() {
        let frags = vec![
            Segment::line(p(0.0, 0.0), p(2.0, 0.0)),
            Segment::line(p(2.0, 0.0), p(4.0, 0.0)),
            Segment::line(p(4.0, 0.0), p(4.0, 2.0)),
            Segment::line(p(4.0, 2.0), p(2.0, 2.0)),
            Segment::line(p(2.0, 2.0), p(0.0, 2.0)),
            Segment::line(p(0.0, 2.0), p(0.0, 0.0)),
            Segment::line(p(2.0, 0.0), p(2.0, 2.0)),
        ];
        let g = CurveGraph::new(frags, TopologyParams::new(1e-3)).unwrap();
        let mut areas: Vec<f64> = g.extracted_loops().iter().map(Border::signed_area).collect();
        areas.sort_by(f64::total_cmp);
        assert_eq!(areas.len(), 3);
        assert!((areas[0] + 8.0).abs() < 1e-12);
        assert!((areas[1] - 4.0).abs() < 1e-12);
        assert!((areas[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn circle_from_two_arcs() {
        let frags = vec![
            Segment::arc(p(1.0, 0.0), p(-1.0, 0.0), 1.0),
            Segment::arc(p(1.0, 0.0), p(-1.0, 0.0), -1.0),
        ];
        let g = CurveGraph::new(frags, TopologyParams::new(1e-3)).unwrap();
        let loops = g.extracted_loops();
        assert_eq!(loops.len(), 2);
        for l in loops {
            assert!((l.area() - std::f64::consts::PI).abs() < 1e-9);
        }
    }

    #[test]
    fn bowtie_splits_at_the_shared_vertex() {
        let frags = vec![
            Segment::line(p(0.0, 0.0), p(2.0, -2.0)),
            Segment::line(p(2.0, -2.0), p(2.0, 2.0)),
            Segment::line(p(2.0, 2.0), p(0.0, 0.0)),
            Segment::line(p(0.0, 0.0), p(-2.0, 2.0)),
            Segment::line(p(-2.0, 2.0), p(-2.0, -2.0)),
            Segment::line(p(-2.0, -2.0), p(0.0, 0.0)),
        ];
        for shift in 0..frags.len() {
            let mut rotated = frags.clone();
            rotated.rotate_left(shift);
            let g = CurveGraph::new(rotated, TopologyParams::new(1e-3)).unwrap();
            let mut areas: Vec<f64> = g.extracted_loops().iter().map(Border::signed_area).collect();
            areas.sort_by(f64::total_cmp);
            assert_eq!(areas.len(), 4, "shift {shift}: {areas:?}");
            for (a, expected) in areas.iter().zip([-4.0, -4.0, 4.0, 4.0]) {
                assert!((a - expected).abs() < 1e-12, "shift {shift}: {areas:?}");
            }
        }
    }
}
