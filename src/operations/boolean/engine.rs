use tracing::debug;

use crate::error::Result;
use crate::geometry::{Border, Curve2D, Segment};
use crate::math::Rect2;

use super::assemble::stitch_loops;
use super::classify::classify_piece;
use super::select::{should_keep_piece, BooleanOp, KeepDecision};
use super::split::{split_operand, Operand, Piece};
use super::BooleanParams;

/// Loops of an overlay result, split by orientation.
#[derive(Debug, Clone, Default)]
pub struct OverlayResult {
    /// Counter-clockwise loops.
    pub outlines: Vec<Border>,
    /// Clockwise loops.
    pub holes: Vec<Border>,
}

impl OverlayResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty() && self.holes.is_empty()
    }

    fn push(&mut self, border: Border) {
        if border.signed_area() > 0.0 {
            self.outlines.push(border);
        } else {
            self.holes.push(border);
        }
    }
}

/// Boolean overlay of two oriented loop sets.
///
/// Each operand is a set of non-crossing loops with outlines counter-clockwise
/// and holes clockwise; a point belongs to the operand's region when the summed
/// winding number is positive.
#[derive(Debug)]
pub struct BorderBoolean {
    a: Vec<Border>,
    b: Vec<Border>,
    op: BooleanOp,
    params: BooleanParams,
}

impl BorderBoolean {
    /// Creates a new overlay operation with default tolerances.
    #[must_use]
    pub fn new(a: Vec<Border>, b: Vec<Border>, op: BooleanOp) -> Self {
        Self {
            a,
            b,
            op,
            params: BooleanParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: BooleanParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the overlay.
    ///
    /// Pipeline: split both operands at their mutual hits, classify each piece
    /// against the other operand, select per operation, stitch the kept pieces
    /// and sort the loops by orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if an internal spatial index cannot be built.
    pub fn execute(&self) -> Result<OverlayResult> {
        let eps = self.params.pos_equal_eps;

        if !loops_bounds(&self.a).inflated(eps).overlaps(&loops_bounds(&self.b)) {
            return Ok(self.disjoint_result());
        }

        let split_a = split_operand(&self.a, &self.b, Operand::A, eps)?;
        let split_b = split_operand(&self.b, &self.a, Operand::B, eps)?;

        let kept: Vec<Segment> = split_a
            .pieces
            .iter()
            .map(|piece| (piece, &self.b))
            .chain(split_b.pieces.iter().map(|piece| (piece, &self.a)))
            .filter_map(|(piece, other)| self.select(piece, other))
            .collect();

        debug!(
            op = ?self.op,
            pieces = split_a.pieces.len() + split_b.pieces.len(),
            kept = kept.len(),
            "border overlay"
        );

        let mut result = OverlayResult::default();
        for border in stitch_loops(&kept, self.params.join_eps)? {
            let border = border.simplified(eps);
            // Slivers thinner than the position tolerance carry no area.
            if border.area() <= eps * border.length() {
                continue;
            }
            result.push(border);
        }
        Ok(result)
    }

    fn select(&self, piece: &Piece, other: &[Border]) -> Option<Segment> {
        let class = classify_piece(&piece.segment, other, self.params.pos_equal_eps);
        match should_keep_piece(piece.source, class, self.op) {
            KeepDecision::Keep => Some(piece.segment),
            KeepDecision::KeepReversed => Some(piece.segment.reversed()),
            KeepDecision::Discard => None,
        }
    }

    fn disjoint_result(&self) -> OverlayResult {
        let mut result = OverlayResult::default();
        let keep: &[&[Border]] = match self.op {
            BooleanOp::Union => &[&self.a, &self.b],
            BooleanOp::Intersection => &[],
            BooleanOp::Difference => &[&self.a],
        };
        for border in keep.iter().flat_map(|loops| loops.iter()) {
            result.push(border.clone());
        }
        result
    }
}

fn loops_bounds(loops: &[Border]) -> Rect2 {
    loops
        .iter()
        .fold(Rect2::empty(), |acc, b| acc.union(&b.bounds()))
}
