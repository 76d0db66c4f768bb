pub mod directive;
pub mod fragment;
pub mod group;
pub mod merge;
pub mod resample;

pub use directive::{ControlBlock, DirectiveWarning, ParsedDirective, parse_directive};
pub use fragment::{AnimationFragment, BoneChannels, split_fragment_name};
pub use group::{SequenceGroup, SequenceGroups};
pub use merge::ReconstructedSequence;
