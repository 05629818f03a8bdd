use tracing::debug;

use crate::error::Result;
use crate::geometry::{Border, PointLocation};
use crate::math::{Point2, TOLERANCE};
use crate::operations::boolean::{relate, BooleanParams, BorderRelation, Contact, Relation};
use crate::region::{CompoundShape, SimpleShape};

use super::CurveGraph;

/// Extracted loops partitioned by orientation.
#[derive(Debug, Clone, Default)]
pub struct TopologyResult {
    /// Counter-clockwise face loops, smallest first.
    pub outer: Vec<Border>,
    /// Clockwise loops around connected components, smallest first.
    pub inner: Vec<Border>,
}

/// How to pick a region from the graph around a seed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BorderSelection {
    /// The largest loop containing the seed.
    Hull(Point2),
    /// The smallest face loop containing the seed.
    Innermost(Point2),
    /// The smallest face loop containing the seed, minus every separate
    /// component drawn inside it that does not contain the seed.
    ExcludingHoles(Point2),
}

impl CurveGraph {
    /// Partitions the extracted loops into face loops and component
    /// boundaries, each sorted by area.
    #[must_use]
    pub fn extract_borders(&self) -> TopologyResult {
        let mut result = TopologyResult::default();
        for border in &self.loops {
            if border.is_ccw() {
                result.outer.push(border.clone());
            } else {
                result.inner.push(border.clone());
            }
        }
        result.outer.sort_by(|a, b| a.area().total_cmp(&b.area()));
        result.inner.sort_by(|a, b| a.area().total_cmp(&b.area()));
        result
    }

    /// Picks a single region around a seed point.
    ///
    /// Returns `None` if no loop contains the seed.
    ///
    /// # Errors
    ///
    /// Returns an error if classifying a hole candidate fails.
    pub fn select(&self, selection: BorderSelection) -> Result<Option<SimpleShape>> {
        let borders = self.extract_borders();
        match selection {
            BorderSelection::Hull(seed) => Ok(borders
                .outer
                .iter()
                .chain(&borders.inner)
                .filter(|b| encloses(b, &seed))
                .max_by(|a, b| a.area().total_cmp(&b.area()))
                .map(|b| SimpleShape::from_border(b.clone()))),
            BorderSelection::Innermost(seed) => Ok(innermost_face(&borders, &seed)
                .map(|b| SimpleShape::from_border(b.clone()))),
            BorderSelection::ExcludingHoles(seed) => {
                let Some(outline) = innermost_face(&borders, &seed) else {
                    return Ok(None);
                };
                let holes = self.holes_inside(outline, &borders.inner, &seed)?;
                Ok(Some(SimpleShape::new(outline.clone(), holes)))
            }
        }
    }

    /// Assembles every component into one region: components nested an even
    /// number of levels deep are material, odd levels are holes.
    ///
    /// Component boundaries are split where they pinch at a single cluster,
    /// so loops meeting only at a point come back as separate shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if a Boolean step fails.
    pub fn compound_shape(&self, params: &BooleanParams) -> Result<CompoundShape> {
        let hulls = self.extract_borders().inner.into_iter().map(Border::to_ccw).collect();
        CompoundShape::from_borders(hulls, params)
    }

    /// Component hulls strictly inside `outline` that do not contain `seed`,
    /// keeping only the outermost ones.
    fn holes_inside(&self, outline: &Border, hulls: &[Border], seed: &Point2) -> Result<Vec<Border>> {
        let params = BooleanParams::default();
        let mut candidates: Vec<Border> = Vec::new();
        for hull in hulls {
            if encloses(hull, seed) || hull.area() >= outline.area() {
                continue;
            }
            if strictly_covers(outline, hull, &params)? {
                candidates.push(hull.clone().to_ccw());
            }
        }

        // Largest first, so a candidate only needs checking against kept ones.
        candidates.sort_by(|a, b| b.area().total_cmp(&a.area()));
        let mut holes: Vec<Border> = Vec::new();
        for candidate in candidates {
            let mut nested = false;
            for kept in &holes {
                if strictly_covers(kept, &candidate, &params)? {
                    nested = true;
                    break;
                }
            }
            if !nested {
                holes.push(candidate);
            }
        }
        debug!(holes = holes.len(), "collected holes for selection");
        Ok(holes)
    }
}

fn encloses(border: &Border, p: &Point2) -> bool {
    border.locate(p, TOLERANCE) == PointLocation::Inside
}

fn innermost_face<'a>(borders: &'a TopologyResult, seed: &Point2) -> Option<&'a Border> {
    // Faces are sorted smallest first.
    borders.outer.iter().find(|b| encloses(b, seed))
}

fn strictly_covers(outer: &Border, inner: &Border, params: &BooleanParams) -> Result<bool> {
    Ok(matches!(
        relate(outer, inner, params)?,
        Relation::Definite {
            relation: BorderRelation::FirstCoversSecond,
            contact: Contact::None,
        }
    ))
}
