use tracing::debug;

use crate::error::TopologyError;
use crate::geometry::{Curve2D, Segment};
use crate::math::{normalize_angle, Point2};

use super::cluster::ClusterId;
use super::joint::{JointEnd, Side};
use super::CurveGraph;

impl CurveGraph {
    /// Sorts the joint ends of every cluster with three or more of them
    /// counter-clockwise by the direction in which each joint leaves the
    /// cluster.
    ///
    /// The direction is taken where the joint crosses a small circle around
    /// the cluster (half the distance to the nearest adjacent cluster), which
    /// separates joints that share a tangent but curve apart. Joints that miss
    /// the circle fall back to their end tangent.
    pub(super) fn sort_radially(&mut self) {
        let ids: Vec<_> = self
            .clusters
            .iter()
            .filter(|(_, c)| c.degree() >= 3)
            .map(|(id, _)| id)
            .collect();

        let mut unsorted = 0usize;
        for id in ids {
            match self.radial_order(id) {
                Ok(ends) => {
                    if let Some(cluster) = self.clusters.get_mut(id) {
                        cluster.ends = ends;
                    }
                }
                Err(e) => {
                    unsorted += 1;
                    debug!("cluster left unsorted: {e}");
                }
            }
        }
        if unsorted > 0 {
            debug!(unsorted, "radial sort skipped inconsistent clusters");
        }
    }

    /// Joint ends of `id` in counter-clockwise order. Fails if an end refers
    /// to a missing joint or to a joint attached elsewhere.
    fn radial_order(&self, id: ClusterId) -> Result<Vec<JointEnd>, TopologyError> {
        let cluster = self.cluster(id)?;
        let center = cluster.position;
        let radius = 0.5 * self.nearest_neighbor_distance(id);

        let mut keyed = Vec::with_capacity(cluster.ends.len());
        for &end in &cluster.ends {
            let joint = self.joints.get(end.joint).ok_or_else(|| {
                TopologyError::InvalidTopology(format!(
                    "cluster with {} ends refers to a removed joint",
                    cluster.ends.len()
                ))
            })?;
            if joint.cluster(end.side) != id {
                return Err(TopologyError::InvalidTopology(
                    "joint end registered at the wrong cluster".into(),
                ));
            }
            keyed.push((leaving_angle(&joint.segment, end.side, &center, radius), end));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(keyed.into_iter().map(|(_, end)| end).collect())
    }

    /// Distance to the nearest cluster connected by a joint, or the shortest
    /// incident joint when every joint returns to the same cluster.
    fn nearest_neighbor_distance(&self, id: ClusterId) -> f64 {
        let center = self.clusters[id].position;
        let mut nearest = f64::INFINITY;
        let mut shortest = f64::INFINITY;
        for end in &self.clusters[id].ends {
            let Some(joint) = self.joints.get(end.joint) else {
                continue;
            };
            shortest = shortest.min(joint.length());
            let other = joint.other(end.side);
            if other == id {
                continue;
            }
            if let Some(c) = self.clusters.get(other) {
                nearest = nearest.min((c.position - center).norm());
            }
        }
        if nearest.is_finite() {
            nearest
        } else {
            shortest
        }
    }
}

/// Angle in `[0, 2π)` at which `seg` leaves `center` through the given end.
fn leaving_angle(seg: &Segment, side: Side, center: &Point2, radius: f64) -> f64 {
    let hits = seg.intersect_circle(center, radius);
    let crossing = match side {
        Side::Start => hits.first(),
        Side::End => hits.last(),
    };
    let direction = match crossing {
        Some(&t) => seg.point_at(t) - center,
        None => match side {
            Side::Start => seg.start_direction(),
            Side::End => -seg.end_direction(),
        },
    };
    normalize_angle(direction.y.atan2(direction.x))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::TopologyParams;
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn leaving_angle_uses_circle_crossing() {
        // A semicircle leaving the origin heading straight down, curving back up.
        let arc = Segment::arc(p(0.0, 0.0), p(2.0, 0.0), 1.0);
        let a = leaving_angle(&arc, Side::Start, &p(0.0, 0.0), 0.5);
        assert!(a > 1.5 * std::f64::consts::PI && a < 2.0 * std::f64::consts::PI);
        let b = leaving_angle(&arc, Side::End, &p(2.0, 0.0), 0.5);
        assert!(b > std::f64::consts::PI && b < 1.5 * std::f64::consts::PI);
    }

    #[test]
    fn hub_ends_are_sorted_ccw() {
        // Two triangles sharing the origin plus a spoke pair to a third.
        let frags = vec![
            Segment::line(p(0.0, 0.0), p(4.0, 0.0)),
            Segment::line(p(4.0, 0.0), p(4.0, 4.0)),
            Segment::line(p(4.0, 4.0), p(0.0, 0.0)),
            Segment::line(p(-4.0, 0.0), p(0.0, 0.0)),
            Segment::line(p(-4.0, -4.0), p(-4.0, 0.0)),
            Segment::line(p(0.0, 0.0), p(-4.0, -4.0)),
        ];
        let g = CurveGraph::new(frags, TopologyParams::new(0.01)).unwrap();
        let hub = g
            .clusters
            .values()
            .find(|c| c.position.coords.norm() < 1e-9)
            .unwrap();
        assert_eq!(hub.degree(), 4);
        let angles: Vec<f64> = hub
            .ends
            .iter()
            .map(|e| {
                let j = &g.joints[e.joint];
                leaving_angle(&j.segment, e.side, &hub.position, 1.0)
            })
            .collect();
        assert!(angles.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn stale_joint_end_is_reported() {
        let frags = vec![
            Segment::line(p(0.0, 0.0), p(4.0, 0.0)),
            Segment::line(p(4.0, 0.0), p(4.0, 4.0)),
            Segment::line(p(4.0, 4.0), p(0.0, 0.0)),
            Segment::line(p(-4.0, 0.0), p(0.0, 0.0)),
            Segment::line(p(-4.0, -4.0), p(-4.0, 0.0)),
            Segment::line(p(0.0, 0.0), p(-4.0, -4.0)),
        ];
        let mut g = CurveGraph::new(frags, TopologyParams::new(0.01)).unwrap();
        let hub = g
            .clusters
            .iter()
            .find(|(_, c)| c.position.coords.norm() < 1e-9)
            .map(|(id, _)| id)
            .unwrap();
        assert!(g.radial_order(hub).is_ok());

        let stale = g.clusters[hub].ends[0].joint;
        g.joints.remove(stale);
        assert!(matches!(
            g.radial_order(hub),
            Err(TopologyError::InvalidTopology(_))
        ));

        let before = g.clusters[hub].ends.clone();
        g.sort_radially();
        assert_eq!(g.clusters[hub].ends, before);
    }
}
