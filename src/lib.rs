pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod region;
pub mod topology;

pub use error::{PlanisError, Result};
