use crate::geometry::{Border, Curve2D, Segment};

/// Keeps the pieces that lie on the requested side of `original` at (nearly)
/// the full offset distance.
///
/// A piece survives if its midpoint is at least `|distance| - dist_eps` away
/// from the original border and on the side the offset moves towards.
#[must_use]
pub fn apply(pieces: Vec<Segment>, original: &Border, distance: f64, dist_eps: f64) -> Vec<Segment> {
    let threshold = distance.abs() - dist_eps;
    // Left of a counter-clockwise loop is its inside.
    let want_inside = (distance > 0.0) == original.is_ccw();

    pieces
        .into_iter()
        .filter(|piece| {
            let mid = piece.midpoint();
            if original.distance_to(&mid) < threshold {
                return false;
            }
            (original.winding_number(&mid) != 0) == want_inside
        })
        .filter(|piece| piece.length() > dist_eps)
        .collect()
}
