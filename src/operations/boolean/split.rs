use crate::error::Result;
use crate::geometry::{Border, Curve2D, Segment};
use crate::math::spatial::BoxIndex;

/// Which operand a boundary piece came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    A,
    B,
}

/// An atomic boundary piece: a stretch of one input loop between two
/// consecutive hits with the other operand.
#[derive(Debug, Clone, Copy)]
pub struct Piece {
    pub segment: Segment,
    pub source: Operand,
}

/// Pieces of one operand plus the number of hits that produced them.
#[derive(Debug, Default)]
pub struct SplitResult {
    pub pieces: Vec<Piece>,
    pub hit_count: usize,
}

/// Splits every segment of `loops` at all hits with the segments of `other`.
///
/// Candidate pairs are found with a box index over `other`'s segments. Cuts
/// closer than `eps` (in arc length) to a segment end or to each other are
/// dropped so no piece is shorter than `eps`.
///
/// # Errors
///
/// Returns an error if the spatial index cannot be built.
pub fn split_operand(
    loops: &[Border],
    other: &[Border],
    source: Operand,
    eps: f64,
) -> Result<SplitResult> {
    let other_segments: Vec<&Segment> = other.iter().flat_map(Border::segments).collect();
    let index = BoxIndex::new(other_segments.iter().map(|s| s.bounds().inflated(eps)))?;

    let mut result = SplitResult::default();
    for border in loops {
        for seg in border.segments() {
            let mut cuts = Vec::new();
            for j in index.query(&seg.bounds().inflated(eps)) {
                let hits = seg.intersect(other_segments[j], eps);
                result.hit_count += hits.len();
                cuts.extend(hits.iter().map(|h| h.t_self));
            }
            result.pieces.extend(
                split_at_params(seg, cuts, eps)
                    .into_iter()
                    .map(|segment| Piece { segment, source }),
            );
        }
    }
    Ok(result)
}

/// Splits `seg` at the parameters in `cuts`.
pub(crate) fn split_at_params(seg: &Segment, mut cuts: Vec<f64>, eps: f64) -> Vec<Segment> {
    let len = seg.length();
    if len <= eps {
        return vec![*seg];
    }
    cuts.sort_by(f64::total_cmp);

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut prev = 0.0;
    for t in cuts {
        if (t - prev) * len <= eps || (1.0 - t) * len <= eps {
            continue;
        }
        pieces.push(seg.trim(prev, t));
        prev = t;
    }
    pieces.push(seg.trim(prev, 1.0));
    pieces
}
