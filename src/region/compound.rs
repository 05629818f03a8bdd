use std::ops::{Add, Mul, Sub};

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Border, Curve2D, PointLocation, Segment};
use crate::math::{Matrix3, Point2, Rect2};
use crate::operations::boolean::{BooleanParams, BorderRelation, OverlayResult};

use super::casework::classify_outlines;
use super::SimpleShape;

/// A set of pairwise disjoint simple shapes.
///
/// Every public operation returns a compound shape whose members do not
/// overlap.
#[derive(Debug, Clone, Default)]
pub struct CompoundShape {
    shapes: Vec<SimpleShape>,
}

impl CompoundShape {
    /// The empty region.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_simple(shape: SimpleShape) -> Self {
        Self {
            shapes: vec![shape],
        }
    }

    /// Unites arbitrary, possibly overlapping shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if a Boolean step fails.
    pub fn from_shapes(shapes: Vec<SimpleShape>, params: &BooleanParams) -> Result<Self> {
        Self::new().union(&Self { shapes }, params)
    }

    /// Builds a region from loops of unknown orientation by nesting depth:
    /// loops inside an even number of others add material, loops inside an
    /// odd number remove it.
    ///
    /// # Errors
    ///
    /// Returns an error if a Boolean step fails.
    pub fn from_borders(borders: Vec<Border>, params: &BooleanParams) -> Result<Self> {
        let mut borders: Vec<Border> = borders.into_iter().map(Border::to_ccw).collect();
        borders.sort_by(|a, b| b.area().total_cmp(&a.area()));

        let mut depths: Vec<Option<usize>> = vec![Some(0); borders.len()];
        for i in 0..borders.len() {
            for j in 0..i {
                if depths[j].is_none() {
                    continue;
                }
                match classify_outlines(&borders[j], &borders[i], params)?.0 {
                    BorderRelation::FirstCoversSecond => {
                        depths[i] = depths[i].map(|d| d + 1);
                    }
                    // Repeated loops count once.
                    BorderRelation::Identical => {
                        depths[i] = None;
                        break;
                    }
                    _ => {}
                }
            }
        }

        let max_depth = depths.iter().flatten().copied().max().unwrap_or(0);
        let mut result = Self::new();
        for level in 0..=max_depth {
            let shapes: Vec<SimpleShape> = borders
                .iter()
                .zip(&depths)
                .filter(|(_, d)| **d == Some(level))
                .map(|(b, _)| SimpleShape::from_border(b.clone()))
                .collect();
            if shapes.is_empty() {
                continue;
            }
            let layer = Self::from_shapes(shapes, params)?;
            result = if level % 2 == 0 {
                result.union(&layer, params)?
            } else {
                result.difference(&layer, params)?
            };
        }
        Ok(result)
    }

    /// Splits oriented loops into outlines and holes and nests them.
    pub(crate) fn from_oriented_loops(loops: Vec<Border>, eps: f64) -> Self {
        let mut overlay = OverlayResult::default();
        for border in loops {
            if border.is_ccw() {
                overlay.outlines.push(border);
            } else {
                overlay.holes.push(border);
            }
        }
        Self::from_overlay(overlay, eps)
    }

    /// Assigns every hole of an overlay result to the smallest outline that
    /// contains it.
    pub(crate) fn from_overlay(result: OverlayResult, eps: f64) -> Self {
        let mut outlines = result.outlines;
        outlines.sort_by(|a, b| a.area().total_cmp(&b.area()));
        let mut holes: Vec<Vec<Border>> = vec![Vec::new(); outlines.len()];

        let mut orphans = 0usize;
        for hole in result.holes {
            let area = hole.area();
            let owner = outlines
                .iter()
                .position(|o| o.area() > area && loop_inside(&hole, o, eps));
            match owner {
                Some(k) => holes[k].push(hole),
                None => orphans += 1,
            }
        }
        if orphans > 0 {
            debug!(orphans, "dropping holes without an enclosing outline");
        }

        Self {
            shapes: outlines
                .into_iter()
                .zip(holes)
                .map(|(o, h)| SimpleShape::new(o, h))
                .collect(),
        }
    }

    /// Appends shapes known to be disjoint from `self`.
    #[must_use]
    pub(crate) fn unite_disjunct(mut self, other: Self) -> Self {
        self.shapes.extend(other.shapes);
        self
    }

    #[must_use]
    pub fn simple_shapes(&self) -> &[SimpleShape] {
        &self.shapes
    }

    #[must_use]
    pub fn into_simple_shapes(self) -> Vec<SimpleShape> {
        self.shapes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.shapes.iter().map(SimpleShape::area).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Rect2 {
        self.shapes
            .iter()
            .fold(Rect2::empty(), |acc, s| acc.union(&s.bounds()))
    }

    #[must_use]
    pub fn locate(&self, p: &Point2, eps: f64) -> PointLocation {
        let mut location = PointLocation::Outside;
        for shape in &self.shapes {
            match shape.locate(p, eps) {
                PointLocation::Inside => return PointLocation::Inside,
                PointLocation::OnBoundary => location = PointLocation::OnBoundary,
                PointLocation::Outside => {}
            }
        }
        location
    }

    #[must_use]
    pub fn contains(&self, p: &Point2, eps: f64, accept_on_boundary: bool) -> bool {
        match self.locate(p, eps) {
            PointLocation::Inside => true,
            PointLocation::OnBoundary => accept_on_boundary,
            PointLocation::Outside => false,
        }
    }

    /// Parameter intervals of `seg` inside any member shape.
    #[must_use]
    pub fn clip(&self, seg: &Segment, eps: f64) -> Vec<(f64, f64)> {
        let seg_bounds = seg.bounds();
        let mut intervals: Vec<(f64, f64)> = self
            .shapes
            .iter()
            .filter(|s| s.bounds().inflated(eps).overlaps(&seg_bounds))
            .flat_map(|s| s.clip(seg, eps))
            .collect();
        intervals.sort_by(|a, b| a.0.total_cmp(&b.0));
        intervals
    }

    #[must_use]
    pub fn transformed(&self, m: &Matrix3) -> Self {
        Self {
            shapes: self.shapes.iter().map(|s| s.transformed(m)).collect(),
        }
    }

    /// Union. Overlapping members are merged until no pair overlaps.
    ///
    /// # Errors
    ///
    /// Returns an error if a pairwise union fails.
    pub fn union(&self, other: &Self, params: &BooleanParams) -> Result<Self> {
        let eps = params.pos_equal_eps;
        let mut pool: Vec<SimpleShape> = self.shapes.iter().chain(&other.shapes).cloned().collect();
        let mut merges = 0usize;

        // Every merge shrinks the pool, so this terminates.
        'scan: loop {
            for i in 0..pool.len() {
                for j in (i + 1)..pool.len() {
                    if !pool[i].bounds().inflated(eps).overlaps(&pool[j].bounds()) {
                        continue;
                    }
                    let merged = SimpleShape::unite(&pool[i], &pool[j], params)?;
                    if merged.len() == 1 {
                        pool.swap_remove(j);
                        pool.swap_remove(i);
                        pool.extend(merged.shapes);
                        merges += 1;
                        continue 'scan;
                    }
                }
            }
            break;
        }

        debug!(merges, shapes = pool.len(), "compound union");
        Ok(Self { shapes: pool })
    }

    /// Intersection of every member pair.
    ///
    /// # Errors
    ///
    /// Returns an error if a pairwise intersection fails.
    pub fn intersection(&self, other: &Self, params: &BooleanParams) -> Result<Self> {
        let eps = params.pos_equal_eps;
        let mut result = Self::new();
        for a in &self.shapes {
            for b in &other.shapes {
                if a.bounds().inflated(eps).overlaps(&b.bounds()) {
                    result = result.unite_disjunct(SimpleShape::intersect(a, b, params)?);
                }
            }
        }
        Ok(result)
    }

    /// Removes every member of `other` from every member of `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pairwise subtraction fails.
    pub fn difference(&self, other: &Self, params: &BooleanParams) -> Result<Self> {
        let eps = params.pos_equal_eps;
        let mut result = Self::new();
        for a in &self.shapes {
            let mut pieces = vec![a.clone()];
            for b in &other.shapes {
                let mut next = Vec::with_capacity(pieces.len());
                for piece in pieces {
                    if piece.bounds().inflated(eps).overlaps(&b.bounds()) {
                        next.extend(SimpleShape::subtract(&piece, b, params)?.shapes);
                    } else {
                        next.push(piece);
                    }
                }
                pieces = next;
            }
            result.shapes.extend(pieces);
        }
        Ok(result)
    }
}

/// `true` if `inner` lies inside `outer`, judged by the first segment
/// midpoint of `inner` not on the boundary of `outer`.
fn loop_inside(inner: &Border, outer: &Border, eps: f64) -> bool {
    for seg in inner.segments() {
        match outer.locate(&seg.midpoint(), eps) {
            PointLocation::Inside => return true,
            PointLocation::Outside => return false,
            PointLocation::OnBoundary => {}
        }
    }
    false
}

impl From<SimpleShape> for CompoundShape {
    fn from(shape: SimpleShape) -> Self {
        Self::from_simple(shape)
    }
}

// Operators use default tolerances and cannot report errors: on failure they
// log and fall back to the unmodified left operand (or the empty region for
// intersection).

impl Add for &CompoundShape {
    type Output = CompoundShape;

    fn add(self, rhs: Self) -> CompoundShape {
        self.union(rhs, &BooleanParams::default()).unwrap_or_else(|e| {
            warn!("union failed, keeping left operand: {e}");
            self.clone()
        })
    }
}

impl Mul for &CompoundShape {
    type Output = CompoundShape;

    fn mul(self, rhs: Self) -> CompoundShape {
        self.intersection(rhs, &BooleanParams::default())
            .unwrap_or_else(|e| {
                warn!("intersection failed, returning empty region: {e}");
                CompoundShape::new()
            })
    }
}

impl Sub for &CompoundShape {
    type Output = CompoundShape;

    fn sub(self, rhs: Self) -> CompoundShape {
        self.difference(rhs, &BooleanParams::default())
            .unwrap_or_else(|e| {
                warn!("difference failed, keeping left operand unsplit: {e}");
                self.clone()
            })
    }
}

impl Add for CompoundShape {
    type Output = CompoundShape;

    fn add(self, rhs: Self) -> CompoundShape {
        &self + &rhs
    }
}

impl Mul for CompoundShape {
    type Output = CompoundShape;

    fn mul(self, rhs: Self) -> CompoundShape {
        &self * &rhs
    }
}

impl Sub for CompoundShape {
    type Output = CompoundShape;

    fn sub(self, rhs: Self) -> CompoundShape {
        &self - &rhs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Border {
        Border::rectangle(p(x0, y0), p(x1, y1)).unwrap()
    }

    fn square(x0: f64, y0: f64, s: f64) -> CompoundShape {
        SimpleShape::from_border(rect(x0, y0, x0 + s, y0 + s)).into()
    }

    #[test]
    fn union_merges_chain_of_overlaps() {
        let a = square(0.0, 0.0, 2.0).unite_disjunct(square(3.0, 0.0, 2.0));
        let bridge = square(1.5, 0.5, 2.0);
        let u = &a + &bridge;
        assert_eq!(u.len(), 1);
        assert!((u.area() - (12.0 - 0.75 - 0.75)).abs() < 1e-9);
    }

    #[test]
    fn union_keeps_disjoint_members() {
        let u = square(0.0, 0.0, 1.0) + square(5.0, 5.0, 1.0);
        assert_eq!(u.len(), 2);
        assert!((u.area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn intersection_and_difference() {
        let a = square(0.0, 0.0, 4.0);
        let b = square(2.0, 2.0, 4.0);
        assert!(((&a * &b).area() - 4.0).abs() < 1e-9);
        assert!(((&a - &b).area() - 12.0).abs() < 1e-9);
        assert!(((&b - &a).area() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn difference_splits_into_pieces() {
        let a = square(0.0, 0.0, 6.0);
        let bar: CompoundShape = SimpleShape::from_border(rect(2.0, -1.0, 4.0, 7.0)).into();
        let d = &a - &bar;
        assert_eq!(d.len(), 2);
        assert!((d.area() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn from_borders_nests_by_parity() {
        let borders = vec![
            rect(2.0, 2.0, 8.0, 8.0),
            rect(0.0, 0.0, 10.0, 10.0).to_cw(),
            rect(4.0, 4.0, 6.0, 6.0),
        ];
        let shape = CompoundShape::from_borders(borders, &BooleanParams::default()).unwrap();
        assert_eq!(shape.len(), 2);
        assert!((shape.area() - (100.0 - 36.0 + 4.0)).abs() < 1e-9);
        assert!(shape.contains(&p(5.0, 5.0), 1e-9, false));
        assert!(!shape.contains(&p(3.0, 3.0), 1e-9, false));
        assert!(shape.contains(&p(1.0, 1.0), 1e-9, false));
    }

    #[test]
    fn overlay_holes_go_to_smallest_enclosing_outline() {
        let overlay = OverlayResult {
            outlines: vec![rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)],
            holes: vec![rect(2.0, 2.0, 8.0, 8.0).to_cw(), rect(4.5, 4.5, 5.5, 5.5).to_cw()],
        };
        let shape = CompoundShape::from_overlay(overlay, 1e-9);
        assert_eq!(shape.len(), 2);
        for s in shape.simple_shapes() {
            assert_eq!(s.holes().len(), 1);
        }
        assert!((shape.area() - (100.0 - 36.0 + 4.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn clip_collects_member_intervals() {
        let shape = square(0.0, 0.0, 1.0).unite_disjunct(square(2.0, 0.0, 1.0));
        let line = Segment::line(p(-1.0, 0.5), p(4.0, 0.5));
        let intervals = shape.clip(&line, 1e-9);
        assert_eq!(intervals.len(), 2);
        assert!((intervals[0].0 - 0.2).abs() < 1e-12 && (intervals[1].1 - 0.8).abs() < 1e-12);
    }
}
