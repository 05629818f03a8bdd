mod assemble;
mod classify;
mod engine;
mod relate;
mod select;
mod split;

pub use classify::PieceClass;
pub use engine::{BorderBoolean, OverlayResult};
pub use relate::{relate, BorderRelation, Contact, Relation};
pub use select::BooleanOp;

pub(crate) use assemble::stitch_loops;
pub(crate) use split::split_at_params;

/// Tolerances for border overlay and relationship classification.
#[derive(Debug, Clone, Copy)]
pub struct BooleanParams {
    /// Distance below which two positions are treated as equal; also the
    /// distance within which a piece counts as lying on the other boundary.
    pub pos_equal_eps: f64,
    /// Distance within which piece endpoints are joined while stitching.
    pub join_eps: f64,
}

impl Default for BooleanParams {
    fn default() -> Self {
        Self {
            pos_equal_eps: 1e-7,
            join_eps: 1e-6,
        }
    }
}

impl BooleanParams {
    #[must_use]
    pub fn with_pos_equal_eps(mut self, eps: f64) -> Self {
        self.pos_equal_eps = eps;
        self
    }

    #[must_use]
    pub fn with_join_eps(mut self, eps: f64) -> Self {
        self.join_eps = eps;
        self
    }
}
