use crate::geometry::{Curve2D, Segment};

use super::cluster::ClusterId;

slotmap::new_key_type! {
    /// Unique identifier for a joint (graph edge) in the curve graph.
    pub struct JointId;
}

/// Which end of a joint touches a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// A joint end as stored in a cluster's incidence list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JointEnd {
    pub joint: JointId,
    pub side: Side,
}

/// A joint traversed in a given direction during loop extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedJoint {
    /// The joint identifier.
    pub joint: JointId,
    /// If `true`, the joint is traversed start → end.
    pub forward: bool,
}

impl OrientedJoint {
    #[must_use]
    pub fn new(joint: JointId, forward: bool) -> Self {
        Self { joint, forward }
    }

    /// The end of the joint this traversal arrives at.
    #[must_use]
    pub fn arrival(self) -> JointEnd {
        JointEnd {
            joint: self.joint,
            side: if self.forward { Side::End } else { Side::Start },
        }
    }

    /// The traversal that leaves a cluster through `end`.
    #[must_use]
    pub fn leaving(end: JointEnd) -> Self {
        Self::new(end.joint, end.side == Side::Start)
    }
}

/// A curve fragment connecting two clusters.
#[derive(Debug, Clone)]
pub struct JointData {
    /// The fragment geometry, in input direction.
    pub segment: Segment,
    /// Cluster of the fragment's start point.
    pub start: ClusterId,
    /// Cluster of the fragment's end point.
    pub end: ClusterId,
    /// `true` for connectors synthesized by gap closing.
    pub synthetic: bool,
    /// `true` once the joint has been taken out of its clusters' incidence
    /// lists (too short to sort reliably).
    pub detached: bool,
}

impl JointData {
    #[must_use]
    pub fn new(segment: Segment, start: ClusterId, end: ClusterId) -> Self {
        Self {
            segment,
            start,
            end,
            synthetic: false,
            detached: false,
        }
    }

    /// Cluster at the given side.
    #[must_use]
    pub fn cluster(&self, side: Side) -> ClusterId {
        match side {
            Side::Start => self.start,
            Side::End => self.end,
        }
    }

    /// Cluster at the opposite side.
    #[must_use]
    pub fn other(&self, side: Side) -> ClusterId {
        match side {
            Side::Start => self.end,
            Side::End => self.start,
        }
    }

    /// Ends of this joint, start first.
    #[must_use]
    pub fn ends(&self, id: JointId) -> [(ClusterId, JointEnd); 2] {
        [
            (
                self.start,
                JointEnd {
                    joint: id,
                    side: Side::Start,
                },
            ),
            (
                self.end,
                JointEnd {
                    joint: id,
                    side: Side::End,
                },
            ),
        ]
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.segment.length()
    }
}
