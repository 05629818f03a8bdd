//! Pairwise Boolean operations on simple shapes.
//!
//! Each operation classifies the two outlines first. Configurations whose
//! result follows from the classification alone are answered directly; any
//! interaction of holes with the other shape goes through the overlay engine.

use tracing::debug;

use crate::error::Result;
use crate::geometry::{Border, PointLocation};
use crate::operations::boolean::{
    relate, BooleanOp, BooleanParams, BorderBoolean, BorderRelation, Contact, Relation,
};

use super::{CompoundShape, SimpleShape};

/// How a set of holes sits relative to another outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoleState {
    /// Every hole is area-disjoint from the outline.
    Clear,
    /// Some hole covers the outline entirely.
    Swallowed,
    /// Anything else.
    Mixed,
}

/// Classifies two outlines, settling ambiguous results with the probe point.
///
/// # Errors
///
/// Returns an error if the relationship primitive fails.
pub(crate) fn classify_outlines(
    a: &Border,
    b: &Border,
    params: &BooleanParams,
) -> Result<(BorderRelation, Contact)> {
    Ok(settle(relate(a, b, params)?, a, b, params.pos_equal_eps))
}

/// Turns a relation into a definite classification. An ambiguous result is
/// decided by locating the probe, an interior point of the smaller border,
/// in the larger one: inside means covered, outside means disjoint.
fn settle(relation: Relation, a: &Border, b: &Border, eps: f64) -> (BorderRelation, Contact) {
    match relation {
        Relation::Definite { relation, contact } => (relation, contact),
        Relation::Ambiguous { probe } => {
            let a_smaller = a.area() <= b.area();
            let larger = if a_smaller { b } else { a };
            let contained = larger.locate(&probe, eps) != PointLocation::Outside;
            let relation = match (contained, a_smaller) {
                (false, _) => BorderRelation::Disjoint,
                (true, true) => BorderRelation::SecondCoversFirst,
                (true, false) => BorderRelation::FirstCoversSecond,
            };
            debug!(?relation, "resolved ambiguous relation by probe point");
            (relation, Contact::Point)
        }
    }
}

fn hole_state(holes: &[Border], outline: &Border, params: &BooleanParams) -> Result<HoleState> {
    let mut state = HoleState::Clear;
    for hole in holes {
        match classify_outlines(hole, outline, params)?.0 {
            BorderRelation::Disjoint => {}
            BorderRelation::FirstCoversSecond | BorderRelation::Identical => {
                return Ok(HoleState::Swallowed);
            }
            BorderRelation::SecondCoversFirst | BorderRelation::Intersecting => {
                state = HoleState::Mixed;
            }
        }
    }
    Ok(state)
}

/// `true` if every hole is disjoint from `outline` without touching it.
fn holes_strictly_apart(holes: &[Border], outline: &Border, params: &BooleanParams) -> Result<bool> {
    for hole in holes {
        if classify_outlines(hole, outline, params)? != (BorderRelation::Disjoint, Contact::None) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn overlay(
    a: &SimpleShape,
    b: &SimpleShape,
    op: BooleanOp,
    params: &BooleanParams,
) -> Result<CompoundShape> {
    let result = BorderBoolean::new(a.loops(), b.loops(), op)
        .with_params(*params)
        .execute()?;
    Ok(CompoundShape::from_overlay(result, params.pos_equal_eps))
}

impl SimpleShape {
    /// Area common to both shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if classification or the overlay fails.
    pub fn intersect(a: &Self, b: &Self, params: &BooleanParams) -> Result<CompoundShape> {
        if !a.bounds().inflated(params.pos_equal_eps).overlaps(&b.bounds()) {
            return Ok(CompoundShape::new());
        }
        let (relation, _) = classify_outlines(a.outline(), b.outline(), params)?;
        match relation {
            BorderRelation::Disjoint => Ok(CompoundShape::new()),
            BorderRelation::FirstCoversSecond => match hole_state(a.holes(), b.outline(), params)? {
                HoleState::Clear => Ok(CompoundShape::from_simple(b.clone())),
                HoleState::Swallowed => Ok(CompoundShape::new()),
                HoleState::Mixed => overlay(a, b, BooleanOp::Intersection, params),
            },
            BorderRelation::SecondCoversFirst => match hole_state(b.holes(), a.outline(), params)? {
                HoleState::Clear => Ok(CompoundShape::from_simple(a.clone())),
                HoleState::Swallowed => Ok(CompoundShape::new()),
                HoleState::Mixed => overlay(a, b, BooleanOp::Intersection, params),
            },
            BorderRelation::Identical if a.holes().is_empty() && b.holes().is_empty() => {
                Ok(CompoundShape::from_simple(a.clone()))
            }
            BorderRelation::Identical | BorderRelation::Intersecting => {
                overlay(a, b, BooleanOp::Intersection, params)
            }
        }
    }

    /// Area covered by either shape.
    ///
    /// # Errors
    ///
    /// Returns an error if classification or the overlay fails.
    pub fn unite(a: &Self, b: &Self, params: &BooleanParams) -> Result<CompoundShape> {
        let classified = classify_outlines(a.outline(), b.outline(), params)?;
        Self::unite_classified(a, b, classified, params)
    }

    fn unite_classified(
        a: &Self,
        b: &Self,
        (relation, contact): (BorderRelation, Contact),
        params: &BooleanParams,
    ) -> Result<CompoundShape> {
        match relation {
            BorderRelation::Disjoint if contact == Contact::Edge => {
                overlay(a, b, BooleanOp::Union, params)
            }
            BorderRelation::Disjoint => Ok(CompoundShape::from_simple(a.clone())
                .unite_disjunct(CompoundShape::from_simple(b.clone()))),
            BorderRelation::FirstCoversSecond => {
                if hole_state(a.holes(), b.outline(), params)? == HoleState::Clear {
                    Ok(CompoundShape::from_simple(a.clone()))
                } else {
                    overlay(a, b, BooleanOp::Union, params)
                }
            }
            BorderRelation::SecondCoversFirst => {
                if hole_state(b.holes(), a.outline(), params)? == HoleState::Clear {
                    Ok(CompoundShape::from_simple(b.clone()))
                } else {
                    overlay(a, b, BooleanOp::Union, params)
                }
            }
            BorderRelation::Identical if a.holes().is_empty() || b.holes().is_empty() => {
                let solid = if a.holes().is_empty() { a } else { b };
                Ok(CompoundShape::from_simple(solid.clone()))
            }
            BorderRelation::Identical | BorderRelation::Intersecting => {
                overlay(a, b, BooleanOp::Union, params)
            }
        }
    }

    /// Area of `a` not covered by `b`.
    ///
    /// When `b` sits strictly inside the material of `a`, its outline becomes
    /// a new hole of `a` and its own holes come back as separate islands.
    ///
    /// # Errors
    ///
    /// Returns an error if classification or the overlay fails.
    pub fn subtract(a: &Self, b: &Self, params: &BooleanParams) -> Result<CompoundShape> {
        if !a.bounds().inflated(params.pos_equal_eps).overlaps(&b.bounds()) {
            return Ok(CompoundShape::from_simple(a.clone()));
        }
        let (relation, contact) = classify_outlines(a.outline(), b.outline(), params)?;
        match relation {
            BorderRelation::Disjoint => Ok(CompoundShape::from_simple(a.clone())),
            BorderRelation::FirstCoversSecond
                if contact == Contact::None
                    && holes_strictly_apart(a.holes(), b.outline(), params)? =>
            {
                let mut holes = a.holes().to_vec();
                holes.push(b.outline().clone());
                let mut result = CompoundShape::from_simple(Self::new(a.outline().clone(), holes));
                for island in b.holes() {
                    result = result.unite_disjunct(CompoundShape::from_simple(Self::from_border(
                        island.clone(),
                    )));
                }
                Ok(result)
            }
            BorderRelation::SecondCoversFirst
                if hole_state(b.holes(), a.outline(), params)? == HoleState::Clear =>
            {
                Ok(CompoundShape::new())
            }
            BorderRelation::Identical if b.holes().is_empty() => Ok(CompoundShape::new()),
            _ => overlay(a, b, BooleanOp::Difference, params),
        }
    }
}
