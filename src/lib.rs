//! Relic reconstructs playable skeletal animation sequences from a legacy
//! game engine's archive records and converts them into a modern rig's
//! bone-pose representation.
//!
//! The pipeline demultiplexes interleaved per-bone sample streams, stitches
//! animation fragments back into their authored base sequences (detecting
//! frame-continuity gaps), resamples fragments captured at divergent rates
//! onto one canonical rate via cubic splines, and emits JSON exchange
//! documents. On the consumption side, the pose reconstructor turns sampled
//! bone transforms into the target rig's local space through bind-pose
//! composition, inversion, and a fixed coordinate-convention remap.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod errors;
pub mod math;
pub mod output;
pub mod pipeline;
pub mod pose;
pub mod records;
pub mod sequence;
pub mod skeleton;

pub use errors::{RelicError, Result};
pub use output::{ExportTree, SequenceDocument};
pub use pipeline::{Pipeline, PipelineOutput, RunStats};
pub use pose::{BonePose, CoordinateConvention, PoseReconstructor};
pub use records::{Aabb, AnimationRecord, HierarchyRecord, RawSample};
pub use sequence::{
    AnimationFragment, ControlBlock, ReconstructedSequence, SequenceGroup, parse_directive,
};
pub use skeleton::{Skeleton, SkeletonNode, SkeletonRegistry};
