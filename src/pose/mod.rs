pub mod convention;
pub mod reconstruct;

pub use convention::CoordinateConvention;
pub use reconstruct::{BindPose, BonePose, PoseReconstructor};
