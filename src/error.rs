use thiserror::Error;

/// Top-level error type for the planis region kernel.
#[derive(Debug, Error)]
pub enum PlanisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to curve and border geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length segment")]
    ZeroLength,

    #[error("border is not closed: gap of {gap} between segment {index} and its successor")]
    NotClosed { index: usize, gap: f64 },
}

/// Errors related to the curve graph and loop extraction.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("malformed loop: {0}")]
    MalformedLoop(String),

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to region operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`PlanisError`].
pub type Result<T> = std::result::Result<T, PlanisError>;
