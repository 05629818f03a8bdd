use tracing::debug;

use crate::error::Result;
use crate::geometry::Border;
use crate::operations::boolean::BooleanParams;
use crate::operations::offset::{BorderOffset2D, OffsetParams};

use super::{CompoundShape, SimpleShape};

/// Offsets `border` by `distance` to its left. If the direct offset yields
/// nothing, retries with two half steps.
fn offset_with_retry(border: &Border, distance: f64, params: &OffsetParams) -> Result<Vec<Border>> {
    retry_in_half_steps(border, distance, |b, d| {
        BorderOffset2D::new(b.clone(), d).with_params(*params).execute()
    })
}

/// Applies `offset` once, and when that yields nothing, applies it twice at
/// half the distance, collecting every loop of the second step.
pub(crate) fn retry_in_half_steps<F>(border: &Border, distance: f64, mut offset: F) -> Result<Vec<Border>>
where
    F: FnMut(&Border, f64) -> Result<Vec<Border>>,
{
    let direct = offset(border, distance)?;
    if !direct.is_empty() {
        return Ok(direct);
    }

    debug!(distance, "offset returned nothing, retrying in two half steps");
    let half = 0.5 * distance;
    let mut result = Vec::new();
    for step in offset(border, half)? {
        result.extend(offset(&step, half)?);
    }
    Ok(result)
}

/// Largest loop becomes the outline, the rest its holes.
fn largest_as_outline(mut loops: Vec<Border>) -> Option<SimpleShape> {
    let k = loops
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.area().total_cmp(&b.1.area()))
        .map(|(k, _)| k)?;
    let outline = loops.swap_remove(k);
    Some(SimpleShape::new(outline, loops))
}

impl SimpleShape {
    /// Moves the boundary inward by `distance`: the outline shrinks and the
    /// holes grow. A negative distance expands instead.
    ///
    /// The result may be empty or split into several shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if an offset or Boolean step fails.
    pub fn shrink(
        &self,
        distance: f64,
        offset: &OffsetParams,
        params: &BooleanParams,
    ) -> Result<CompoundShape> {
        if distance < 0.0 {
            return self.expand(-distance, offset, params);
        }
        if distance == 0.0 {
            return Ok(CompoundShape::from_simple(self.clone()));
        }

        // Left of a counter-clockwise outline is inward; left of a clockwise
        // hole is away from the hole.
        let outline_loops = offset_with_retry(self.outline(), distance, offset)?;
        let shrunk = CompoundShape::from_oriented_loops(outline_loops, params.pos_equal_eps);
        if shrunk.is_empty() || self.holes().is_empty() {
            return Ok(shrunk);
        }

        let mut grown_holes = CompoundShape::new();
        for hole in self.holes() {
            if let Some(region) = largest_as_outline(offset_with_retry(hole, distance, offset)?) {
                grown_holes = grown_holes.union(&CompoundShape::from_simple(region), params)?;
            }
        }
        shrunk.difference(&grown_holes, params)
    }

    /// Moves the boundary outward by `distance`: the outline grows and the
    /// holes shrink. A negative distance shrinks instead.
    ///
    /// # Errors
    ///
    /// Returns an error if an offset step fails.
    pub fn expand(
        &self,
        distance: f64,
        offset: &OffsetParams,
        params: &BooleanParams,
    ) -> Result<CompoundShape> {
        if distance < 0.0 {
            return self.shrink(-distance, offset, params);
        }
        if distance == 0.0 {
            return Ok(CompoundShape::from_simple(self.clone()));
        }

        let Some(grown) = largest_as_outline(offset_with_retry(self.outline(), -distance, offset)?)
        else {
            return Ok(CompoundShape::new());
        };

        // Shrunk holes stay inside their original holes, so they are disjoint
        // from each other and from pockets closed by the grown outline.
        let mut holes = grown.holes().to_vec();
        for hole in self.holes() {
            holes.extend(offset_with_retry(hole, -distance, offset)?);
        }
        Ok(CompoundShape::from_simple(SimpleShape::new(grown.outline().clone(), holes)))
    }
}

impl CompoundShape {
    /// Shrinks every member. Shrunk members stay disjoint.
    ///
    /// # Errors
    ///
    /// Returns an error if an offset or Boolean step fails.
    pub fn shrink(&self, distance: f64, offset: &OffsetParams, params: &BooleanParams) -> Result<Self> {
        if distance < 0.0 {
            return self.expand(-distance, offset, params);
        }
        let mut result = Self::new();
        for shape in self.simple_shapes() {
            result = result.unite_disjunct(shape.shrink(distance, offset, params)?);
        }
        Ok(result)
    }

    /// Expands every member and unites the results, which may now overlap.
    ///
    /// # Errors
    ///
    /// Returns an error if an offset or Boolean step fails.
    pub fn expand(&self, distance: f64, offset: &OffsetParams, params: &BooleanParams) -> Result<Self> {
        if distance < 0.0 {
            return self.shrink(-distance, offset, params);
        }
        let mut result = Self::new();
        for shape in self.simple_shapes() {
            result = result.union(&shape.expand(distance, offset, params)?, params)?;
        }
        Ok(result)
    }
}
