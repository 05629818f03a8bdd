//! Planar regions bounded by borders: simple shapes with holes, and sets of
//! disjoint simple shapes closed under the Boolean operations.

mod casework;
mod compound;
mod offsetting;
mod signature;
mod simple;

pub use compound::CompoundShape;
pub use signature::ShapeSignature;
pub use simple::SimpleShape;
