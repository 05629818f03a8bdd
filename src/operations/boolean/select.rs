use super::classify::PieceClass;
use super::split::Operand;

/// The type of Boolean operation on two regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// `A - B`.
    Difference,
}

/// Decision about whether to keep a boundary piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepDecision {
    Keep,
    KeepReversed,
    Discard,
}

/// Determines whether a piece survives into the result boundary.
///
/// | Piece  | vs other region | Union   | Intersection | Difference (A-B) |
/// |--------|-----------------|---------|--------------|------------------|
/// | from A | outside B       | keep    | discard      | keep             |
/// | from A | inside B        | discard | keep         | discard          |
/// | from A | shared, same    | keep    | keep         | discard          |
/// | from A | shared, opposite| discard | discard      | keep             |
/// | from B | outside A       | keep    | discard      | discard          |
/// | from B | inside A        | discard | keep         | keep (reversed)  |
/// | from B | shared          | discard | discard      | discard          |
///
/// Shared stretches are taken from A only so they appear once.
#[allow(clippy::match_same_arms)]
#[must_use]
pub fn should_keep_piece(source: Operand, class: PieceClass, op: BooleanOp) -> KeepDecision {
    match (source, class, op) {
        (Operand::A, PieceClass::Outside, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::A, PieceClass::Outside, BooleanOp::Intersection) => KeepDecision::Discard,
        (Operand::A, PieceClass::Outside, BooleanOp::Difference) => KeepDecision::Keep,

        (Operand::A, PieceClass::Inside, BooleanOp::Union) => KeepDecision::Discard,
        (Operand::A, PieceClass::Inside, BooleanOp::Intersection) => KeepDecision::Keep,
        (Operand::A, PieceClass::Inside, BooleanOp::Difference) => KeepDecision::Discard,

        (Operand::A, PieceClass::SharedSame, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::A, PieceClass::SharedSame, BooleanOp::Intersection) => KeepDecision::Keep,
        (Operand::A, PieceClass::SharedSame, BooleanOp::Difference) => KeepDecision::Discard,

        (Operand::A, PieceClass::SharedOpposite, BooleanOp::Union) => KeepDecision::Discard,
        (Operand::A, PieceClass::SharedOpposite, BooleanOp::Intersection) => KeepDecision::Discard,
        (Operand::A, PieceClass::SharedOpposite, BooleanOp::Difference) => KeepDecision::Keep,

        (Operand::B, PieceClass::Outside, BooleanOp::Union) => KeepDecision::Keep,
        (Operand::B, PieceClass::Outside, _) => KeepDecision::Discard,

        (Operand::B, PieceClass::Inside, BooleanOp::Union) => KeepDecision::Discard,
        (Operand::B, PieceClass::Inside, BooleanOp::Intersection) => KeepDecision::Keep,
        (Operand::B, PieceClass::Inside, BooleanOp::Difference) => KeepDecision::KeepReversed,

        (Operand::B, PieceClass::SharedSame | PieceClass::SharedOpposite, _) => {
            KeepDecision::Discard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_keeps_outside_pieces() {
        assert_eq!(
            should_keep_piece(Operand::A, PieceClass::Outside, BooleanOp::Union),
            KeepDecision::Keep
        );
        assert_eq!(
            should_keep_piece(Operand::B, PieceClass::Outside, BooleanOp::Union),
            KeepDecision::Keep
        );
        assert_eq!(
            should_keep_piece(Operand::B, PieceClass::Inside, BooleanOp::Union),
            KeepDecision::Discard
        );
    }

    #[test]
    fn difference_reverses_b_inside() {
        assert_eq!(
            should_keep_piece(Operand::B, PieceClass::Inside, BooleanOp::Difference),
            KeepDecision::KeepReversed
        );
        assert_eq!(
            should_keep_piece(Operand::A, PieceClass::SharedOpposite, BooleanOp::Difference),
            KeepDecision::Keep
        );
    }

    #[test]
    fn shared_pieces_come_from_a_only() {
        for op in [BooleanOp::Union, BooleanOp::Intersection, BooleanOp::Difference] {
            assert_eq!(
                should_keep_piece(Operand::B, PieceClass::SharedSame, op),
                KeepDecision::Discard
            );
        }
        assert_eq!(
            should_keep_piece(Operand::A, PieceClass::SharedSame, BooleanOp::Intersection),
            KeepDecision::Keep
        );
    }
}
