pub mod border;
pub mod curve;
pub mod interior;

pub use border::{Border, PointLocation};
pub use curve::{ArcSeg, Curve2D, CurveHit, LineSeg, Segment};
pub use interior::{interior_point, InteriorParams};
