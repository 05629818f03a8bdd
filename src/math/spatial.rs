use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

use crate::error::{OperationError, Result};

use super::{Point2, Rect2};

/// Packed static R-tree over axis-aligned boxes, queried by rectangle.
///
/// Item indices follow insertion order.
pub(crate) struct BoxIndex {
    index: StaticAABB2DIndex<f64>,
}

impl BoxIndex {
    /// Builds the index from boxes in item order.
    pub(crate) fn new(boxes: impl ExactSizeIterator<Item = Rect2>) -> Result<Self> {
        let mut builder = StaticAABB2DIndexBuilder::new(boxes.len());
        for r in boxes {
            builder.add(r.min.x, r.min.y, r.max.x, r.max.y);
        }
        let index = builder
            .build()
            .map_err(|e| OperationError::Failed(format!("spatial index build: {e:?}")))?;
        Ok(Self { index })
    }

    /// Builds an index of squares of half-size `radius` around points.
    pub(crate) fn around_points(points: &[Point2], radius: f64) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|p| Rect2::from_point(*p).inflated(radius)),
        )
    }

    /// Indices of all items whose box overlaps `r`.
    pub(crate) fn query(&self, r: &Rect2) -> Vec<usize> {
        self.index.query(r.min.x, r.min.y, r.max.x, r.max.y)
    }

    /// Indices of all items whose box overlaps the square of half-size
    /// `radius` around `p`.
    pub(crate) fn query_point(&self, p: &Point2, radius: f64) -> Vec<usize> {
        self.query(&Rect2::from_point(*p).inflated(radius))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn finds_overlapping_boxes() {
        let boxes = vec![
            Rect2::new(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)),
            Rect2::new(Point2::new(5.0, 5.0), Point2::new(6.0, 6.0)),
            Rect2::new(Point2::new(0.5, 0.5), Point2::new(2.0, 2.0)),
        ];
        let index = BoxIndex::new(boxes.into_iter()).unwrap();
        let mut hits = index.query_point(&Point2::new(0.75, 0.75), 0.1);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 2]);
        assert!(index.query_point(&Point2::new(3.5, 3.5), 0.1).is_empty());
    }

    #[test]
    fn point_index_radius() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let index = BoxIndex::around_points(&pts, 0.25).unwrap();
        assert_eq!(index.query_point(&Point2::new(0.9, 0.1), 0.0), vec![1]);
        assert_eq!(index.query_point(&Point2::new(0.5, 0.0), 0.3).len(), 2);
    }

    #[test]
    fn empty_index() {
        let index = BoxIndex::new(std::iter::empty()).unwrap();
        assert!(index.query_point(&Point2::origin(), 1.0).is_empty());
    }
}
