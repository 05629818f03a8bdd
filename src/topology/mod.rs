//! Curve soup to topology.
//!
//! [`CurveGraph`] clusters fragment endpoints into nodes, closes small gaps,
//! prunes dead ends and redundant joints, orders the joints around every
//! cluster and walks the resulting planar graph into closed borders.

pub mod cluster;
pub mod joint;
mod radial;
mod repair;
mod select;
mod walk;

pub use cluster::{ClusterData, ClusterId};
pub use joint::{JointData, JointEnd, JointId, OrientedJoint, Side};
pub use select::{BorderSelection, TopologyResult};

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{OperationError, Result, TopologyError};
use crate::geometry::{Border, Curve2D, Segment};

/// Tolerances for topology reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct TopologyParams {
    /// Largest endpoint gap bridged by a synthesized connector.
    pub max_gap: f64,
    /// Radius within which endpoints merge into one cluster.
    pub cluster_size: f64,
}

impl TopologyParams {
    /// Parameters with `cluster_size = max_gap`.
    #[must_use]
    pub fn new(max_gap: f64) -> Self {
        Self {
            max_gap,
            cluster_size: max_gap,
        }
    }

    #[must_use]
    pub fn with_cluster_size(mut self, cluster_size: f64) -> Self {
        self.cluster_size = cluster_size;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.max_gap.is_finite() && self.max_gap > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "max_gap must be positive, got {}",
                self.max_gap
            ))
            .into());
        }
        if !(self.cluster_size.is_finite() && self.cluster_size > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "cluster_size must be positive, got {}",
                self.cluster_size
            ))
            .into());
        }
        Ok(())
    }
}

/// Planar graph built from unordered curve fragments.
///
/// Clusters and joints live in slotmap arenas and reference each other by
/// key; removing an entity clears its slot.
#[derive(Debug)]
pub struct CurveGraph {
    params: TopologyParams,
    clusters: SlotMap<ClusterId, ClusterData>,
    joints: SlotMap<JointId, JointData>,
    dead: Vec<Segment>,
    loops: Vec<Border>,
}

impl CurveGraph {
    /// Builds the graph and extracts its loops.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for non-positive tolerances, or
    /// a spatial index error. Malformed loops are skipped, not reported.
    pub fn new(fragments: impl IntoIterator<Item = Segment>, params: TopologyParams) -> Result<Self> {
        params.validate()?;
        let fragments: Vec<Segment> = fragments.into_iter().collect();

        let mut graph = Self {
            params,
            clusters: SlotMap::with_key(),
            joints: SlotMap::with_key(),
            dead: Vec::new(),
            loops: Vec::new(),
        };

        // Step 1: Cluster endpoints.
        let endpoints: Vec<_> = fragments
            .iter()
            .flat_map(|s| [s.start_point(), s.end_point()])
            .collect();
        let ids = cluster::assign(&endpoints, params.cluster_size, &mut graph.clusters)?;
        for (segment, pair) in fragments.into_iter().zip(ids.chunks_exact(2)) {
            graph.add_joint(JointData::new(segment, pair[0], pair[1]));
        }

        // Step 2: Close gaps.
        let connectors = graph.close_gaps()?;

        // Steps 3-5: Prune dead ends and redundant joints.
        let pruned = graph.prune_dead_ends();
        let duplicates = graph.suppress_duplicates();
        let short = graph.suppress_short_joints();
        let cascaded = graph.prune_dead_ends();
        debug!(
            clusters = graph.clusters.len(),
            connectors,
            pruned = pruned + cascaded,
            duplicates,
            short,
            "curve graph built"
        );

        // Step 6: Radial ordering.
        graph.sort_radially();

        // Step 7: Loop extraction.
        graph.loops = graph.extract_loops();
        Ok(graph)
    }

    /// Inserts a joint and registers both its ends with their clusters.
    pub(crate) fn add_joint(&mut self, data: JointData) -> JointId {
        let (start, end) = (data.start, data.end);
        let id = self.joints.insert(data);
        for (cluster, side) in [(start, Side::Start), (end, Side::End)] {
            if let Some(c) = self.clusters.get_mut(cluster) {
                c.ends.push(JointEnd { joint: id, side });
            }
        }
        id
    }

    /// Returns a reference to the cluster data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn cluster(&self, id: ClusterId) -> std::result::Result<&ClusterData, TopologyError> {
        self.clusters
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("cluster".into()))
    }

    /// Returns a reference to the joint data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the graph.
    pub fn joint(&self, id: JointId) -> std::result::Result<&JointData, TopologyError> {
        self.joints
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("joint".into()))
    }

    #[must_use]
    pub fn params(&self) -> &TopologyParams {
        &self.params
    }

    /// Number of live clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Number of live joints, including detached short ones.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Fragments removed by dead-end pruning.
    #[must_use]
    pub fn dead_objects(&self) -> &[Segment] {
        &self.dead
    }

    /// Every loop found by the last extraction, in walk order.
    #[cfg(any(test, debug_assertions))]
    #[must_use]
    pub fn extracted_loops(&self) -> &[Border] {
        &self.loops
    }
}
