pub mod model;
pub mod registry;

pub use model::{Skeleton, SkeletonNode};
pub use registry::SkeletonRegistry;
