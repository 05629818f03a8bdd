mod border_offset;

pub use border_offset::{BorderOffset2D, OffsetParams};
