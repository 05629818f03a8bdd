use crate::error::Result;
use crate::geometry::{interior_point, Border, Curve2D, InteriorParams, PointLocation, Segment};
use crate::math::{Matrix3, Point2, Rect2};

/// One outline with zero or more holes.
///
/// The outline runs counter-clockwise and every hole clockwise. Holes are
/// assumed pairwise disjoint and strictly inside the outline; constructors
/// do not verify this.
#[derive(Debug, Clone)]
pub struct SimpleShape {
    outline: Border,
    holes: Vec<Border>,
}

impl SimpleShape {
    /// Creates a shape, normalizing loop orientations.
    #[must_use]
    pub fn new(outline: Border, holes: Vec<Border>) -> Self {
        Self {
            outline: outline.to_ccw(),
            holes: holes.into_iter().map(Border::to_cw).collect(),
        }
    }

    /// A shape without holes.
    #[must_use]
    pub fn from_border(outline: Border) -> Self {
        Self::new(outline, Vec::new())
    }

    #[must_use]
    pub fn outline(&self) -> &Border {
        &self.outline
    }

    #[must_use]
    pub fn holes(&self) -> &[Border] {
        &self.holes
    }

    /// Outline followed by holes, as an oriented loop set.
    #[must_use]
    pub fn loops(&self) -> Vec<Border> {
        std::iter::once(self.outline.clone())
            .chain(self.holes.iter().cloned())
            .collect()
    }

    /// Enclosed area minus the area of the holes.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.outline.area() - self.holes.iter().map(Border::area).sum::<f64>()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect2 {
        self.outline.bounds()
    }

    /// Locates a point against the shape. A point inside a hole is outside.
    #[must_use]
    pub fn locate(&self, p: &Point2, eps: f64) -> PointLocation {
        match self.outline.locate(p, eps) {
            PointLocation::Inside => {}
            other => return other,
        }
        for hole in &self.holes {
            match hole.locate(p, eps) {
                PointLocation::Inside => return PointLocation::Outside,
                PointLocation::OnBoundary => return PointLocation::OnBoundary,
                PointLocation::Outside => {}
            }
        }
        PointLocation::Inside
    }

    /// Containment test with caller-selected boundary handling.
    #[must_use]
    pub fn contains(&self, p: &Point2, eps: f64, accept_on_boundary: bool) -> bool {
        match self.locate(p, eps) {
            PointLocation::Inside => true,
            PointLocation::OnBoundary => accept_on_boundary,
            PointLocation::Outside => false,
        }
    }

    /// A point strictly inside the shape, avoiding holes.
    ///
    /// # Errors
    ///
    /// Returns an error if triangulation fails.
    pub fn interior_point(&self) -> Result<Option<Point2>> {
        interior_point(&self.outline, &self.holes, &InteriorParams::default())
    }

    /// Parameter intervals of `seg` lying inside the shape or on its
    /// boundary, sorted and merged.
    #[must_use]
    pub fn clip(&self, seg: &Segment, eps: f64) -> Vec<(f64, f64)> {
        let mut cuts = vec![0.0, 1.0];
        let seg_bounds = seg.bounds().inflated(eps);
        for border in std::iter::once(&self.outline).chain(&self.holes) {
            if !border.bounds().overlaps(&seg_bounds) {
                continue;
            }
            for other in border.segments() {
                cuts.extend(seg.intersect(other, eps).iter().map(|h| h.t_self));
            }
        }
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|a, b| (*a - *b).abs() <= f64::EPSILON);

        let mut intervals: Vec<(f64, f64)> = Vec::new();
        for w in cuts.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            if self.locate(&seg.point_at(0.5 * (t0 + t1)), eps) == PointLocation::Outside {
                continue;
            }
            match intervals.last_mut() {
                Some(last) if (last.1 - t0).abs() <= f64::EPSILON => last.1 = t1,
                _ => intervals.push((t0, t1)),
            }
        }
        intervals
    }

    /// Applies a rigid or mirror transform, restoring loop orientations.
    #[must_use]
    pub fn transformed(&self, m: &Matrix3) -> Self {
        Self::new(
            self.outline.transformed(m),
            self.holes.iter().map(|h| h.transformed(m)).collect(),
        )
    }
}
