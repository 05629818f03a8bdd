use crate::geometry::{Border, Curve2D, Segment};
use crate::math::Point2;

/// Classification of a boundary piece against the other operand's region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceClass {
    Inside,
    Outside,
    /// Lies on the other boundary, running the same way.
    SharedSame,
    /// Lies on the other boundary, running the opposite way.
    SharedOpposite,
}

impl PieceClass {
    #[must_use]
    pub fn is_shared(self) -> bool {
        matches!(self, Self::SharedSame | Self::SharedOpposite)
    }
}

/// Sum of the winding numbers of `loops` around `p`.
///
/// With outlines counter-clockwise and holes clockwise, a positive value means
/// `p` is inside the region.
#[must_use]
pub fn region_winding(loops: &[Border], p: &Point2) -> i32 {
    loops
        .iter()
        .filter(|b| b.bounds().contains(p))
        .map(|b| b.winding_number(p))
        .sum()
}

/// Classifies a piece by its midpoint.
///
/// A midpoint within `eps` of the other boundary makes the piece shared; the
/// tangent of the nearest boundary segment then decides the sense.
#[must_use]
pub fn classify_piece(piece: &Segment, other: &[Border], eps: f64) -> PieceClass {
    let mid = piece.midpoint();

    let mut nearest: Option<(f64, &Segment, f64)> = None;
    for border in other {
        if !border.bounds().inflated(eps).contains(&mid) {
            continue;
        }
        let (i, t, d) = border.closest_segment(&mid);
        if d <= eps && !nearest.is_some_and(|(best, _, _)| best <= d) {
            nearest = Some((d, &border.segments()[i], t));
        }
    }

    if let Some((_, seg, t)) = nearest {
        return if piece.direction_at(0.5).dot(&seg.direction_at(t)) >= 0.0 {
            PieceClass::SharedSame
        } else {
            PieceClass::SharedOpposite
        };
    }

    if region_winding(other, &mid) > 0 {
        PieceClass::Inside
    } else {
        PieceClass::Outside
    }
}
