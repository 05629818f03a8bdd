use tracing::debug;

use crate::error::Result;
use crate::geometry::{interior_point, Border, InteriorParams};
use crate::math::Point2;

use super::classify::{classify_piece, PieceClass};
use super::split::{split_operand, Operand};
use super::BooleanParams;

/// How the areas enclosed by two borders relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderRelation {
    Disjoint,
    FirstCoversSecond,
    SecondCoversFirst,
    Identical,
    Intersecting,
}

/// Whether and how the two boundaries meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// The boundaries meet at isolated points only.
    Point,
    /// The boundaries share a stretch of positive length.
    Edge,
}

/// Outcome of [`relate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relation {
    Definite {
        relation: BorderRelation,
        contact: Contact,
    },
    /// The boundary classification was inconsistent. `probe` is a point
    /// strictly inside the smaller of the two borders; the caller decides
    /// containment by testing it against the larger one.
    Ambiguous { probe: Point2 },
}

#[derive(Debug, Default)]
struct ClassCounts {
    inside: usize,
    outside: usize,
    shared: usize,
}

impl ClassCounts {
    fn add(&mut self, class: PieceClass) {
        match class {
            PieceClass::Inside => self.inside += 1,
            PieceClass::Outside => self.outside += 1,
            PieceClass::SharedSame | PieceClass::SharedOpposite => self.shared += 1,
        }
    }
}

/// Classifies the areas enclosed by `a` and `b` regardless of orientation.
///
/// Both boundaries are split at their mutual hits and every piece is
/// classified against the other area; the relation follows from which classes
/// occur on each side.
///
/// # Errors
///
/// Returns an error if an internal spatial index or triangulation fails.
pub fn relate(a: &Border, b: &Border, params: &BooleanParams) -> Result<Relation> {
    let eps = params.pos_equal_eps;
    if !a.bounds().inflated(eps).overlaps(&b.bounds()) {
        return Ok(Relation::Definite {
            relation: BorderRelation::Disjoint,
            contact: Contact::None,
        });
    }

    let a = [a.clone().to_ccw()];
    let b = [b.clone().to_ccw()];
    let split_a = split_operand(&a, &b, Operand::A, eps)?;
    let split_b = split_operand(&b, &a, Operand::B, eps)?;

    let mut ca = ClassCounts::default();
    for piece in &split_a.pieces {
        ca.add(classify_piece(&piece.segment, &b, eps));
    }
    let mut cb = ClassCounts::default();
    for piece in &split_b.pieces {
        cb.add(classify_piece(&piece.segment, &a, eps));
    }

    let contact = if ca.shared > 0 || cb.shared > 0 {
        Contact::Edge
    } else if split_a.hit_count > 0 {
        Contact::Point
    } else {
        Contact::None
    };

    let relation = if ca.inside + ca.outside + cb.inside + cb.outside == 0 {
        Some(BorderRelation::Identical)
    } else if (ca.inside > 0 && ca.outside > 0) || (cb.inside > 0 && cb.outside > 0) {
        Some(BorderRelation::Intersecting)
    } else if ca.outside == 0 && cb.inside == 0 {
        Some(BorderRelation::SecondCoversFirst)
    } else if cb.outside == 0 && ca.inside == 0 {
        Some(BorderRelation::FirstCoversSecond)
    } else if ca.inside == 0 && cb.inside == 0 {
        Some(BorderRelation::Disjoint)
    } else {
        None
    };

    if let Some(relation) = relation {
        return Ok(Relation::Definite { relation, contact });
    }

    let smaller = if a[0].area() <= b[0].area() { &a[0] } else { &b[0] };
    let probe = interior_point(smaller, &[], &InteriorParams::default())?
        .unwrap_or_else(|| smaller.bounds().center());
    debug!(?probe, "border relation undetermined, falling back to probe point");
    Ok(Relation::Ambiguous { probe })
}
