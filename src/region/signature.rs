//! Rotation and translation normalized fingerprints of shape outlines.

use crate::error::Result;
use crate::geometry::{Border, Curve2D, Segment};
use crate::math::{Matrix3, Point2, Vector2};
use crate::operations::boolean::BooleanParams;

use super::{CompoundShape, SimpleShape};

/// Probe heights as fractions of the aligned bounding box. The positions are
/// deliberately irregular so symmetric shapes do not match by accident.
const HORIZONTAL_PROBES: [f64; 2] = [0.2371, 0.6829];
/// Probe abscissas as fractions of the aligned bounding box.
const VERTICAL_PROBES: [f64; 4] = [0.1423, 0.3917, 0.5862, 0.8377];

/// Fingerprint of an outline in its canonical frame: longest segment along
/// the positive x axis, bounding box at the origin.
#[derive(Debug, Clone)]
pub struct ShapeSignature {
    alignment: Matrix3,
    width: f64,
    height: f64,
    boundary_length: f64,
    /// Inside intervals along each probe line, horizontal probes first,
    /// in canonical coordinates along the line.
    probes: Vec<Vec<(f64, f64)>>,
}

impl ShapeSignature {
    /// Transform taking the outline into its canonical frame.
    #[must_use]
    pub fn alignment(&self) -> &Matrix3 {
        &self.alignment
    }

    #[must_use]
    pub fn boundary_length(&self) -> f64 {
        self.boundary_length
    }

    #[must_use]
    pub fn probes(&self) -> &[Vec<(f64, f64)>] {
        &self.probes
    }

    /// Compares two signatures; `tol` is relative to the shape extent.
    #[must_use]
    pub fn matches(&self, other: &Self, tol: f64) -> bool {
        let abs = tol * self.width.max(self.height);
        let close = |a: f64, b: f64| (a - b).abs() <= abs;
        close(self.width, other.width)
            && close(self.height, other.height)
            && (self.boundary_length - other.boundary_length).abs() <= tol * self.boundary_length
            && self.probes.len() == other.probes.len()
            && self.probes.iter().zip(&other.probes).all(|(a, b)| {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| close(x.0, y.0) && close(x.1, y.1))
            })
    }

    fn at_segment(outline: &Border, k: usize) -> Self {
        let seg = &outline.segments()[k];
        let d = seg.end_point() - seg.start_point();
        let rotation = Matrix3::new_rotation(-d.y.atan2(d.x));
        let min = outline.transformed(&rotation).bounds().min;
        let alignment = Matrix3::new_translation(&Vector2::new(-min.x, -min.y)) * rotation;

        let canonical = SimpleShape::from_border(outline.transformed(&alignment));
        let bounds = canonical.bounds();
        let (w, h) = (bounds.width(), bounds.height());
        let margin = 0.05 * w.max(h);
        let eps = 1e-9 * w.max(h);

        let mut probes = Vec::with_capacity(HORIZONTAL_PROBES.len() + VERTICAL_PROBES.len());
        for f in HORIZONTAL_PROBES {
            let y = f * h;
            let line = Segment::line(Point2::new(-margin, y), Point2::new(w + margin, y));
            probes.push(along(&canonical.clip(&line, eps), -margin, w + 2.0 * margin));
        }
        for f in VERTICAL_PROBES {
            let x = f * w;
            let line = Segment::line(Point2::new(x, -margin), Point2::new(x, h + margin));
            probes.push(along(&canonical.clip(&line, eps), -margin, h + 2.0 * margin));
        }

        Self {
            alignment,
            width: w,
            height: h,
            boundary_length: outline.length(),
            probes,
        }
    }
}

/// Maps parameter intervals on a probe line to coordinates along it.
fn along(intervals: &[(f64, f64)], origin: f64, span: f64) -> Vec<(f64, f64)> {
    intervals
        .iter()
        .map(|&(t0, t1)| (origin + t0 * span, origin + t1 * span))
        .collect()
}

/// Indices of the segments whose length is within `tol` of the longest.
fn longest_segments(outline: &Border, tol: f64) -> Vec<usize> {
    let lengths: Vec<f64> = outline.segments().iter().map(Curve2D::length).collect();
    let longest = lengths.iter().copied().fold(0.0, f64::max);
    lengths
        .iter()
        .enumerate()
        .filter(|&(_, &l)| l >= longest * (1.0 - tol))
        .map(|(k, _)| k)
        .collect()
}

impl SimpleShape {
    /// Fingerprint of the outline, aligned on its first longest segment.
    #[must_use]
    pub fn calculate_signature(&self) -> ShapeSignature {
        let k = longest_segments(self.outline(), 0.0).first().copied().unwrap_or(0);
        ShapeSignature::at_segment(self.outline(), k)
    }

    /// Checks whether `other` is a rotated, translated and possibly mirrored
    /// copy of `self`.
    ///
    /// Signatures only pre-filter candidates; a match is confirmed by
    /// transforming `self` and measuring the symmetric difference with
    /// `other`. Returns the transform mapping `self` onto `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirming Boolean operations fail.
    pub fn is_congruent(
        &self,
        other: &Self,
        tol: f64,
        params: &BooleanParams,
    ) -> Result<Option<Matrix3>> {
        let area = self.area();
        if (area - other.area()).abs() > tol * area || self.holes().len() != other.holes().len() {
            return Ok(None);
        }

        let own = self.calculate_signature();
        let mirror = Matrix3::new_nonuniform_scaling(&Vector2::new(-1.0, 1.0));
        for mirrored in [false, true] {
            let candidate = if mirrored {
                other.transformed(&mirror)
            } else {
                other.clone()
            };
            for k in longest_segments(candidate.outline(), tol) {
                let sig = ShapeSignature::at_segment(candidate.outline(), k);
                if !own.matches(&sig, tol) {
                    continue;
                }
                let to_canonical = if mirrored {
                    sig.alignment * mirror
                } else {
                    sig.alignment
                };
                let Some(back) = to_canonical.try_inverse() else {
                    continue;
                };
                let m = back * own.alignment;
                if self.covers_exactly(other, &m, tol, params)? {
                    return Ok(Some(m));
                }
            }
        }
        Ok(None)
    }

    fn covers_exactly(
        &self,
        other: &Self,
        m: &Matrix3,
        tol: f64,
        params: &BooleanParams,
    ) -> Result<bool> {
        let moved = CompoundShape::from_simple(self.transformed(m));
        let target = CompoundShape::from_simple(other.clone());
        let excess = moved.difference(&target, params)?.area() + target.difference(&moved, params)?.area();
        Ok(excess <= tol * self.area())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::is_mirroring;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn el() -> SimpleShape {
        SimpleShape::from_border(
            Border::from_points(&[
                p(0.0, 0.0),
                p(6.0, 0.0),
                p(6.0, 2.0),
                p(2.0, 2.0),
                p(2.0, 5.0),
                p(0.0, 5.0),
            ])
            .unwrap(),
        )
    }

    fn rigid(angle: f64, dx: f64, dy: f64) -> Matrix3 {
        Matrix3::new_translation(&Vector2::new(dx, dy)) * Matrix3::new_rotation(angle)
    }

    #[test]
    fn signature_is_motion_invariant() {
        let a = el().calculate_signature();
        let b = el().transformed(&rigid(1.1, -3.0, 7.0)).calculate_signature();
        assert!(a.matches(&b, 1e-6));
        assert_eq!(a.probes().len(), 6);
        assert!((a.boundary_length() - 22.0).abs() < 1e-12);
    }

    #[test]
    fn congruent_under_motion() {
        let moved = el().transformed(&rigid(-0.4, 2.0, 1.0));
        let m = el().is_congruent(&moved, 1e-6, &BooleanParams::default()).unwrap().unwrap();
        assert!(!is_mirroring(&m));
        let probe = m.transform_point(&p(6.0, 0.0));
        assert!((probe - rigid(-0.4, 2.0, 1.0).transform_point(&p(6.0, 0.0))).norm() < 1e-6);
    }

    #[test]
    fn congruent_under_mirror() {
        let mirror = Matrix3::new_nonuniform_scaling(&Vector2::new(-1.0, 1.0));
        let flipped = el().transformed(&mirror);
        let m = el().is_congruent(&flipped, 1e-6, &BooleanParams::default()).unwrap().unwrap();
        assert!(is_mirroring(&m));
    }

    #[test]
    fn different_shape_is_not_congruent() {
        let other = SimpleShape::from_border(
            Border::from_points(&[
                p(0.0, 0.0),
                p(6.0, 0.0),
                p(6.0, 2.0),
                p(4.0, 2.0),
                p(4.0, 5.0),
                p(2.0, 5.0),
                p(2.0, 2.0),
                p(0.0, 2.0),
            ])
            .unwrap(),
        );
        assert!((other.area() - el().area()).abs() < 1e-12);
        assert!(el().is_congruent(&other, 1e-6, &BooleanParams::default()).unwrap().is_none());
    }
}
