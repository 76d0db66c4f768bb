//! Pose reconstruction for the target rig.
//!
//! Converts a reconstructed sequence's samples (parent-local transforms in
//! the source engine's basis) into the target rig's per-bone local space.
//! The conversion composes each bone's bind-pose transform, inverts it, and
//! remaps the result through the [`CoordinateConvention`].

use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::pose::convention::CoordinateConvention;
use crate::sequence::fragment::BoneChannels;
use crate::sequence::merge::ReconstructedSequence;
use crate::skeleton::Skeleton;

/// Bind-pose transforms of one skeleton, in target units.
///
/// `locals[i]` is node `i`'s parent-relative bind transform; `globals[i]`
/// composes the parent chain top-down. The first node additionally carries
/// the hierarchy's root translation offset.
#[derive(Debug)]
pub struct BindPose {
    locals: Vec<Affine3A>,
    globals: Vec<Affine3A>,
}

impl BindPose {
    /// Accumulates bind transforms top-down. Valid because parents always
    /// precede children in the node list.
    #[must_use]
    pub fn new(skeleton: &Skeleton, convention: &CoordinateConvention) -> Self {
        let count = skeleton.nodes.len();
        let mut locals = Vec::with_capacity(count);
        let mut globals: Vec<Affine3A> = Vec::with_capacity(count);

        for (index, node) in skeleton.nodes.iter().enumerate() {
            let mut translation = convention.scale_translation(node.translation);
            if index == 0 {
                translation += convention.scale_translation(skeleton.root_translation);
            }

            let local = Affine3A::from_rotation_translation(node.rotation, translation);
            let global = if node.parent_index < 0 {
                local
            } else {
                globals[node.parent_index as usize] * local
            };

            locals.push(local);
            globals.push(global);
        }

        Self { locals, globals }
    }

    /// Node `index`'s parent-relative bind transform.
    #[inline]
    #[must_use]
    pub fn local(&self, index: usize) -> Affine3A {
        self.locals[index]
    }

    /// Node `index`'s cumulative bind transform.
    #[inline]
    #[must_use]
    pub fn global(&self, index: usize) -> Affine3A {
        self.globals[index]
    }
}

/// One bone's keyframe payload for one frame.
///
/// `None` on either component means no keyframe is inserted for that channel
/// at that frame: the source data holds fewer samples than requested, or
/// the bone is not animated by this sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BonePose {
    pub position: Option<Vec3>,
    pub rotation: Option<Quat>,
}

/// Computes target-rig bone poses for one skeleton/sequence pair.
pub struct PoseReconstructor<'a> {
    skeleton: &'a Skeleton,
    convention: CoordinateConvention,
    bind: BindPose,
    /// Uppercased bone name -> skeleton node index.
    node_lookup: FxHashMap<String, usize>,
    /// Uppercased bone name -> channels of the bound sequence.
    channel_lookup: FxHashMap<String, &'a BoneChannels>,
    frame_count: usize,
}

impl<'a> PoseReconstructor<'a> {
    #[must_use]
    pub fn new(
        skeleton: &'a Skeleton,
        sequence: &'a ReconstructedSequence,
        convention: CoordinateConvention,
    ) -> Self {
        let bind = BindPose::new(skeleton, &convention);

        let node_lookup = skeleton
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name.to_ascii_uppercase(), i))
            .collect();

        let channel_lookup = sequence
            .channels
            .iter()
            .map(|(name, channels)| (name.to_ascii_uppercase(), channels))
            .collect();

        Self {
            skeleton,
            convention,
            bind,
            node_lookup,
            channel_lookup,
            frame_count: sequence.frame_count,
        }
    }

    /// The bound sequence's frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// The bind pose computed for the bound skeleton.
    #[inline]
    #[must_use]
    pub fn bind_pose(&self) -> &BindPose {
        &self.bind
    }

    /// Computes the target-rig local pose of `bone_name` at `frame`.
    ///
    /// The bone name matches skeleton node names case-insensitively. Sampled
    /// translations are expressed relative to the bone's bind-pose local
    /// frame via `inverse(bind_local) * sampled_local`; samples and bind
    /// locals share the parent-local space, so the bind-local inverse is the
    /// correct one. Rotations compose as `sample * bind` before the basis
    /// remap.
    #[must_use]
    pub fn bone_pose(&self, bone_name: &str, frame: usize) -> BonePose {
        let key = bone_name.to_ascii_uppercase();
        let Some(&node_index) = self.node_lookup.get(&key) else {
            return BonePose::default();
        };
        let Some(channels) = self.channel_lookup.get(&key) else {
            return BonePose::default();
        };

        let sampled_translation = channels.translations.get(frame).copied();
        let sampled_rotation = channels.rotations.get(frame).copied();

        let position = sampled_translation.map(|t| {
            let local = Affine3A::from_rotation_translation(
                sampled_rotation.unwrap_or(Quat::IDENTITY),
                self.convention.scale_translation(t),
            );
            let in_bind_frame = self.bind.local(node_index).inverse() * local;
            self.convention
                .remap_position(in_bind_frame.translation.into())
        });

        let rotation = sampled_rotation.map(|r| {
            let composed = r * self.skeleton.nodes[node_index].rotation;
            self.convention.remap_rotation(composed)
        });

        BonePose { position, rotation }
    }
}
