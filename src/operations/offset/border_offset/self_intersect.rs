use crate::error::Result;
use crate::geometry::{Curve2D, Segment};
use crate::math::spatial::BoxIndex;

/// Collects, for every segment of a closed raw offset chain, the parameters at
/// which other segments of the chain cross or touch it.
///
/// The shared vertex of consecutive segments is not a cut.
pub fn find_cuts(chain: &[Segment], eps: f64) -> Result<Vec<Vec<f64>>> {
    let n = chain.len();
    let mut cuts = vec![Vec::new(); n];
    if n < 2 {
        return Ok(cuts);
    }

    let index = BoxIndex::new(chain.iter().map(|s| s.bounds().inflated(eps)))?;
    for i in 0..n {
        for j in index.query(&chain[i].bounds().inflated(eps)) {
            if j <= i {
                continue;
            }
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            for hit in chain[i].intersect(&chain[j], eps) {
                if adjacent && is_shared_vertex(chain, i, j, &hit.point, eps) {
                    continue;
                }
                cuts[i].push(hit.t_self);
                cuts[j].push(hit.t_other);
            }
        }
    }
    Ok(cuts)
}

fn is_shared_vertex(chain: &[Segment], i: usize, j: usize, p: &crate::math::Point2, eps: f64) -> bool {
    let joint = if j == i + 1 {
        chain[i].end_point()
    } else {
        chain[i].start_point()
    };
    (p - joint).norm() <= eps
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn bow_tie_crossing() {
        let chain = vec![
            Segment::line(p(0.0, 0.0), p(2.0, 2.0)),
            Segment::line(p(2.0, 2.0), p(2.0, 0.0)),
            Segment::line(p(2.0, 0.0), p(0.0, 2.0)),
            Segment::line(p(0.0, 2.0), p(0.0, 0.0)),
        ];
        let cuts = find_cuts(&chain, 1e-9).unwrap();
        assert_eq!(cuts[0].len(), 1);
        assert!((cuts[0][0] - 0.5).abs() < 1e-9);
        assert_eq!(cuts[2].len(), 1);
        assert!(cuts[1].is_empty() && cuts[3].is_empty());
    }

    #[test]
    fn simple_square_has_no_cuts() {
        let chain = vec![
            Segment::line(p(0.0, 0.0), p(1.0, 0.0)),
            Segment::line(p(1.0, 0.0), p(1.0, 1.0)),
            Segment::line(p(1.0, 1.0), p(0.0, 1.0)),
            Segment::line(p(0.0, 1.0), p(0.0, 0.0)),
        ];
        let cuts = find_cuts(&chain, 1e-9).unwrap();
        assert!(cuts.iter().all(Vec::is_empty));
    }
}
