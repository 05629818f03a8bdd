use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::error::Result;
use crate::geometry::{Curve2D, Segment};
use crate::math::spatial::BoxIndex;
use crate::math::{Point2, TOLERANCE};

use super::cluster::ClusterId;
use super::joint::{JointData, JointId};
use super::CurveGraph;

/// Number of gap-closing passes. The search is not iterated to a fixed point.
const GAP_PASSES: usize = 2;

impl CurveGraph {
    /// Bridges under-connected clusters to the nearest other under-connected
    /// cluster within `max_gap` using straight connectors.
    ///
    /// Returns the number of connectors added.
    pub(super) fn close_gaps(&mut self) -> Result<usize> {
        let max_gap = self.params.max_gap;
        let mut added = 0;

        for _ in 0..GAP_PASSES {
            let open: Vec<ClusterId> = self
                .clusters
                .iter()
                .filter(|(_, c)| c.degree() < 2)
                .map(|(id, _)| id)
                .collect();
            if open.len() < 2 {
                break;
            }
            let positions: Vec<_> = open.iter().map(|&id| self.clusters[id].position).collect();
            let index = BoxIndex::around_points(&positions, 0.0)?;

            let mut pass_added = 0;
            for (k, &id) in open.iter().enumerate() {
                if self.clusters[id].degree() >= 2 {
                    continue;
                }
                let from = positions[k];
                let mut best: Option<(usize, f64)> = None;
                for other in index.query_point(&from, max_gap) {
                    let other_id = open[other];
                    if other == k || self.clusters[other_id].degree() >= 2 || self.are_adjacent(id, other_id) {
                        continue;
                    }
                    let d = (positions[other] - from).norm();
                    if d > TOLERANCE && d <= max_gap && !best.is_some_and(|(_, bd)| bd <= d) {
                        best = Some((other, d));
                    }
                }
                if let Some((other, _)) = best {
                    let mut connector = JointData::new(Segment::line(from, positions[other]), id, open[other]);
                    connector.synthetic = true;
                    self.add_joint(connector);
                    pass_added += 1;
                }
            }
            added += pass_added;
            if pass_added == 0 {
                break;
            }
        }
        Ok(added)
    }

    fn are_adjacent(&self, a: ClusterId, b: ClusterId) -> bool {
        self.clusters[a].ends.iter().any(|e| {
            self.joints
                .get(e.joint)
                .is_some_and(|j| j.other(e.side) == b)
        })
    }

    /// Removes clusters with fewer than two joint ends together with their
    /// joint, cascading to neighbors that drop below two.
    ///
    /// Removed fragments are kept in the dead object list. Returns the number
    /// of joints removed.
    pub(super) fn prune_dead_ends(&mut self) -> usize {
        let mut queue: VecDeque<ClusterId> = self
            .clusters
            .iter()
            .filter(|(_, c)| c.degree() < 2)
            .map(|(id, _)| id)
            .collect();
        let mut removed = 0;

        while let Some(id) = queue.pop_front() {
            let Some(cluster) = self.clusters.get(id) else {
                continue;
            };
            if cluster.degree() >= 2 {
                continue;
            }
            let Some(cluster) = self.clusters.remove(id) else {
                continue;
            };
            for end in cluster.ends {
                let Some(joint) = self.joints.remove(end.joint) else {
                    continue;
                };
                removed += 1;
                let neighbor = joint.other(end.side);
                self.dead.push(joint.segment);
                if let Some(n) = self.clusters.get_mut(neighbor) {
                    n.ends.retain(|e| e.joint != end.joint);
                    if n.degree() < 2 {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        if removed > 0 {
            debug!(removed, "pruned dead-end joints");
        }
        removed
    }

    /// Among joints connecting the same pair of clusters, removes those whose
    /// midpoint lies within `cluster_size` of an already kept one.
    ///
    /// Returns the number of joints removed.
    pub(super) fn suppress_duplicates(&mut self) -> usize {
        let size = self.params.cluster_size;
        let mut groups: HashMap<(ClusterId, ClusterId), Vec<JointId>> = HashMap::new();
        for (id, joint) in &self.joints {
            if joint.detached {
                continue;
            }
            let key = if joint.start <= joint.end {
                (joint.start, joint.end)
            } else {
                (joint.end, joint.start)
            };
            groups.entry(key).or_default().push(id);
        }

        let mut duplicates = Vec::new();
        for ids in groups.values().filter(|ids| ids.len() > 1) {
            let mut kept: Vec<Point2> = Vec::new();
            for &id in ids {
                let mid = self.joints[id].segment.midpoint();
                if kept.iter().any(|k| (k - mid).norm() <= size) {
                    duplicates.push(id);
                } else {
                    kept.push(mid);
                }
            }
        }

        for &id in &duplicates {
            self.remove_joint(id);
        }
        if !duplicates.is_empty() {
            debug!(removed = duplicates.len(), "suppressed duplicate joints");
        }
        duplicates.len()
    }

    /// Takes joints shorter than `cluster_size` out of their clusters'
    /// incidence lists. The joints stay in the arena.
    ///
    /// Returns the number of joints detached.
    pub(super) fn suppress_short_joints(&mut self) -> usize {
        let size = self.params.cluster_size;
        let short: Vec<JointId> = self
            .joints
            .iter()
            .filter(|(_, j)| !j.detached && j.segment.length() < size)
            .map(|(id, _)| id)
            .collect();

        for &id in &short {
            self.detach_joint(id);
            if let Some(j) = self.joints.get_mut(id) {
                j.detached = true;
            }
        }
        short.len()
    }

    fn detach_joint(&mut self, id: JointId) {
        let Some(joint) = self.joints.get(id) else {
            return;
        };
        for cluster in [joint.start, joint.end] {
            if let Some(c) = self.clusters.get_mut(cluster) {
                c.ends.retain(|e| e.joint != id);
            }
        }
    }

    fn remove_joint(&mut self, id: JointId) {
        self.detach_joint(id);
        self.joints.remove(id);
    }
}
