//! Fragment merging.
//!
//! Concatenates the (possibly resampled) per-bone channels of an ordered
//! group into one continuous sequence playing at the group's canonical rate.

use rustc_hash::FxHashMap;

use crate::sequence::fragment::{AnimationFragment, BoneChannels};
use crate::sequence::group::SequenceGroup;
use crate::sequence::resample::{resample_quat, resample_vec3, target_frame_count};

/// One merged, uniform-rate animation sequence.
#[derive(Debug)]
pub struct ReconstructedSequence {
    /// The base-sequence id (or, for standalone clips, the fragment name).
    pub name: String,
    pub namespace: String,
    /// Sum of post-resample fragment frame counts. Individual bones may hold
    /// fewer frames when they are absent from some fragments.
    pub frame_count: usize,
    pub fps: f32,
    pub channels: FxHashMap<String, BoneChannels>,
    /// Carried over from the group for reporting; empty for standalone
    /// clips.
    pub missing_frames: Vec<i32>,
}

impl ReconstructedSequence {
    /// Merges a finalized group into one continuous sequence.
    ///
    /// Fragments whose native rate differs from the group's canonical rate
    /// are resampled individually before concatenation, so every appended
    /// span is already on the common frame grid.
    #[must_use]
    pub fn merge(group: &SequenceGroup) -> Self {
        let fps = group.fragments[0].source_rate;

        let mut frame_count = 0;
        let mut channels: FxHashMap<String, BoneChannels> = FxHashMap::default();

        for fragment in &group.fragments {
            let needs_resample = (fragment.native_rate - fps).abs() > f32::EPSILON;
            frame_count += if needs_resample {
                target_frame_count(fragment.frame_count, fragment.native_rate, fps)
            } else {
                fragment.frame_count
            };

            for (bone, bone_channels) in &fragment.channels {
                let entry = channels.entry(bone.clone()).or_default();
                if needs_resample {
                    entry.translations.extend(resample_vec3(
                        &bone_channels.translations,
                        fragment.native_rate,
                        fps,
                    ));
                    entry.rotations.extend(resample_quat(
                        &bone_channels.rotations,
                        fragment.native_rate,
                        fps,
                    ));
                } else {
                    entry
                        .translations
                        .extend_from_slice(&bone_channels.translations);
                    entry.rotations.extend_from_slice(&bone_channels.rotations);
                }
            }
        }

        Self {
            name: group.base_sequence_id.clone(),
            namespace: group.namespace.clone(),
            frame_count,
            fps,
            channels,
            missing_frames: group.missing_frames.clone(),
        }
    }

    /// Views a standalone fragment as a single-span sequence playing at its
    /// native rate. This is what the pose reconstructor consumes for
    /// ungrouped clips.
    #[must_use]
    pub fn from_fragment(fragment: &AnimationFragment, namespace: &str) -> Self {
        Self {
            name: fragment.name.clone(),
            namespace: namespace.to_string(),
            frame_count: fragment.frame_count,
            fps: fragment.native_rate,
            channels: fragment.channels.clone(),
            missing_frames: Vec::new(),
        }
    }
}
