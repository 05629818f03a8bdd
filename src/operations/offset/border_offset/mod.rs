mod filter;
mod raw_offset;
mod self_intersect;

use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Border, Segment};
use crate::operations::boolean::{split_at_params, stitch_loops};

/// Tolerances for parallel offsetting.
#[derive(Debug, Clone, Copy)]
pub struct OffsetParams {
    /// Slack allowed below the offset distance when filtering pieces.
    pub offset_dist_eps: f64,
    /// Distance within which piece endpoints are joined while stitching.
    pub join_eps: f64,
    /// Distance below which two positions are treated as equal.
    pub pos_equal_eps: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            offset_dist_eps: 1e-4,
            join_eps: 1e-6,
            pos_equal_eps: 1e-7,
        }
    }
}

impl OffsetParams {
    #[must_use]
    pub fn with_offset_dist_eps(mut self, eps: f64) -> Self {
        self.offset_dist_eps = eps;
        self
    }

    #[must_use]
    pub fn with_join_eps(mut self, eps: f64) -> Self {
        self.join_eps = eps;
        self
    }
}

/// Offsets a closed border (with potential arc segments) using the
/// slice-and-filter algorithm.
///
/// Positive distance offsets to the left of the travel direction: inward for
/// a counter-clockwise border, outward for a clockwise one. The result may
/// hold zero, one, or several borders; each keeps the travel direction of the
/// pieces it was built from, so a loop enclosed by an expansion comes out with
/// the opposite orientation.
#[derive(Debug)]
pub struct BorderOffset2D {
    border: Border,
    distance: f64,
    params: OffsetParams,
}

impl BorderOffset2D {
    /// Creates a new border offset operation.
    #[must_use]
    pub fn new(border: Border, distance: f64) -> Self {
        Self {
            border,
            distance,
            params: OffsetParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: OffsetParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the offset.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-finite distance, or a
    /// spatial index error while splitting and stitching.
    pub fn execute(&self) -> Result<Vec<Border>> {
        if !self.distance.is_finite() {
            return Err(OperationError::InvalidInput(format!(
                "offset distance must be finite, got {}",
                self.distance
            ))
            .into());
        }
        if self.distance.abs() < crate::math::TOLERANCE {
            return Ok(vec![self.border.clone()]);
        }

        let eps = self.params.pos_equal_eps;

        // Step 1: Build the raw offset chain.
        let raw = raw_offset::build(&self.border, self.distance, eps);
        if raw.len() < 2 {
            debug!(distance = self.distance, "offset collapsed completely");
            return Ok(Vec::new());
        }

        // Step 2: Find all self-intersections.
        let cuts = self_intersect::find_cuts(&raw, eps)?;

        // Step 3: Slice at the intersection points.
        let pieces: Vec<Segment> = raw
            .iter()
            .zip(cuts)
            .flat_map(|(seg, seg_cuts)| split_at_params(seg, seg_cuts, eps))
            .collect();

        // Step 4: Filter slices by distance to the original.
        let valid = filter::apply(pieces, &self.border, self.distance, self.params.offset_dist_eps);

        // Step 5: Stitch valid slices into result borders.
        let result: Vec<Border> = stitch_loops(&valid, self.params.join_eps)?
            .into_iter()
            .map(|b| b.simplified(eps))
            .filter(|b| b.area() > self.params.offset_dist_eps * b.length())
            .collect();

        debug!(
            distance = self.distance,
            raw = raw.len(),
            borders = result.len(),
            "border offset"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square() -> Border {
        Border::rectangle(p(0.0, 0.0), p(10.0, 10.0)).unwrap()
    }

    #[test]
    fn square_inward_offset() {
        let result = BorderOffset2D::new(square(), 1.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        let b = &result[0];
        assert_eq!(b.segment_count(), 4);
        assert!(b.is_ccw());
        assert!((b.area() - 64.0).abs() < 1e-9);
        let bounds = b.bounds();
        assert!((bounds.min.x - 1.0).abs() < 1e-9 && (bounds.max.y - 9.0).abs() < 1e-9);
    }

    #[test]
    fn square_outward_offset_rounds_corners() {
        let result = BorderOffset2D::new(square(), -1.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - (140.0 + PI)).abs() < 1e-9);
        assert!(result[0].is_ccw());
    }

    #[test]
    fn clockwise_border_offsets_outward_for_positive_distance() {
        let result = BorderOffset2D::new(square().to_cw(), 1.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!(!result[0].is_ccw());
        assert!((result[0].area() - (140.0 + PI)).abs() < 1e-9);
    }

    #[test]
    fn over_shrink_collapses() {
        let result = BorderOffset2D::new(square(), 6.0).execute().unwrap();
        assert!(result.is_empty());
        let circle = Border::circle(p(0.0, 0.0), 1.0).unwrap();
        assert!(BorderOffset2D::new(circle, 2.0).execute().unwrap().is_empty());
    }

    #[test]
    fn circle_shrinks_concentrically() {
        let circle = Border::circle(p(2.0, 2.0), 3.0).unwrap();
        let result = BorderOffset2D::new(circle, 1.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - 4.0 * PI).abs() < 1e-9);
    }

    #[test]
    fn dumbbell_splits_when_waist_closes() {
        // Two 10x10 squares joined by a 10 long, 2 wide bar.
        let dumbbell = Border::from_points(&[
            p(0.0, 0.0),
            p(10.0, 0.0),
            p(10.0, 4.0),
            p(20.0, 4.0),
            p(20.0, 0.0),
            p(30.0, 0.0),
            p(30.0, 10.0),
            p(20.0, 10.0),
            p(20.0, 6.0),
            p(10.0, 6.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
        ])
        .unwrap();
        let result = BorderOffset2D::new(dumbbell, 1.5).execute().unwrap();
        assert_eq!(result.len(), 2);
        // Each half is a 7x7 square with a small bump rounded about the
        // concave corners of the waist.
        for b in &result {
            assert!(b.is_ccw());
            assert!((b.area() - 49.240_078).abs() < 1e-4);
        }
    }

    #[test]
    fn zero_distance_is_identity_and_nan_is_rejected() {
        let result = BorderOffset2D::new(square(), 0.0).execute().unwrap();
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - 100.0).abs() < 1e-12);
        assert!(BorderOffset2D::new(square(), f64::NAN).execute().is_err());
    }
}
