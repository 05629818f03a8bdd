use slotmap::SlotMap;

use crate::error::Result;
use crate::math::spatial::BoxIndex;
use crate::math::Point2;

use super::joint::JointEnd;

slotmap::new_key_type! {
    /// Unique identifier for a cluster in the curve graph.
    pub struct ClusterId;
}

/// A tolerance-merged meeting point of fragment endpoints.
#[derive(Debug, Clone)]
pub struct ClusterData {
    /// Running average of all endpoints absorbed so far.
    pub position: Point2,
    absorbed: usize,
    /// Incident joint ends. Sorted counter-clockwise around `position` once
    /// the graph is built.
    pub ends: Vec<JointEnd>,
}

impl ClusterData {
    /// Creates a cluster seeded with a single endpoint.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            position: point,
            absorbed: 1,
            ends: Vec::new(),
        }
    }

    /// Number of incident joint ends.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.ends.len()
    }

    fn absorb(&mut self, point: &Point2) {
        self.absorbed += 1;
        #[allow(clippy::cast_precision_loss)]
        let n = self.absorbed as f64;
        self.position += (point - self.position) / n;
    }
}

/// Assigns every point to a cluster, creating clusters on demand.
///
/// A point joins the cluster with the nearest centroid within `size`,
/// otherwise it seeds a new one. Candidate clusters are found through the
/// points already assigned within `2 * size`, which covers centroid drift of
/// up to one cluster size.
pub(super) fn assign(
    points: &[Point2],
    size: f64,
    clusters: &mut SlotMap<ClusterId, ClusterData>,
) -> Result<Vec<ClusterId>> {
    let index = BoxIndex::around_points(points, 0.0)?;
    let mut assigned: Vec<Option<ClusterId>> = vec![None; points.len()];
    let mut result = Vec::with_capacity(points.len());

    for (k, p) in points.iter().enumerate() {
        let mut best: Option<(ClusterId, f64)> = None;
        for other in index.query_point(p, 2.0 * size) {
            let Some(id) = assigned[other] else {
                continue;
            };
            let Some(cluster) = clusters.get(id) else {
                continue;
            };
            let d = (cluster.position - p).norm();
            if d <= size && !best.is_some_and(|(_, bd)| bd <= d) {
                best = Some((id, d));
            }
        }

        let id = match best.and_then(|(id, _)| clusters.get_mut(id).map(|c| (id, c))) {
            Some((id, cluster)) => {
                cluster.absorb(p);
                id
            }
            None => clusters.insert(ClusterData::new(*p)),
        };
        assigned[k] = Some(id);
        result.push(id);
    }
    Ok(result)
}
