//! Animation fragments and the sample demultiplexer.
//!
//! An archive animation record stores its samples as one flat array in
//! frame-major/bone-minor order: the first `node_count` samples are frame 0
//! for every animated bone, the next `node_count` samples are frame 1, and
//! so on. Demultiplexing splits that stream into per-bone translation and
//! rotation channels keyed by bone name.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::errors::{RelicError, Result};
use crate::records::AnimationRecord;
use crate::sequence::directive::ControlBlock;
use crate::skeleton::Skeleton;

/// Per-bone channel arrays; both run in frame order and have equal length.
#[derive(Debug, Clone, Default)]
pub struct BoneChannels {
    pub translations: Vec<Vec3>,
    pub rotations: Vec<Quat>,
}

/// One decoded animation record with its samples split into per-bone
/// channels.
#[derive(Debug, Clone)]
pub struct AnimationFragment {
    /// Two-part record name, `<namespace>-<local_name>`.
    pub name: String,
    /// Checksum of the skeleton the record was bound against.
    pub skeleton_checksum: u32,
    pub frame_count: usize,
    /// The rate the samples were captured at.
    pub native_rate: f32,
    /// The canonical rate of the base sequence this fragment belongs to.
    pub source_rate: f32,
    pub layer: u32,
    /// Parsed directive; `None` keeps the fragment out of sequence grouping.
    pub control: Option<ControlBlock>,
    /// Bone name -> channels. Only bones the record animates appear.
    pub channels: FxHashMap<String, BoneChannels>,
}

impl AnimationFragment {
    /// Demultiplexes a record's flat sample stream against its bound
    /// skeleton.
    ///
    /// Hard-fails on any structural mismatch: wrong sample count, wrong
    /// node-index table length, or a node index the skeleton cannot resolve.
    /// A mismatch means the record is corrupt or bound to the wrong
    /// skeleton, and truncating silently would corrupt every sequence the
    /// fragment participates in.
    pub fn demultiplex(
        record: &AnimationRecord,
        skeleton: &Skeleton,
        control: Option<ControlBlock>,
    ) -> Result<Self> {
        let expected = record.node_count * record.frame_count;
        if record.samples.len() != expected {
            return Err(RelicError::SampleCountMismatch {
                name: record.name.clone(),
                expected,
                actual: record.samples.len(),
            });
        }
        if record.node_indices.len() != record.node_count {
            return Err(RelicError::NodeTableMismatch {
                name: record.name.clone(),
                expected: record.node_count,
                actual: record.node_indices.len(),
            });
        }

        // Resolve the cycle table to bone names once up front; this also
        // validates every index before any channel is filled.
        let mut cycle_names = Vec::with_capacity(record.node_count);
        for &index in &record.node_indices {
            let name = skeleton.node_name(index).ok_or_else(|| {
                RelicError::NodeIndexOutOfBounds {
                    name: record.name.clone(),
                    index,
                    node_count: skeleton.nodes.len(),
                }
            })?;
            cycle_names.push(name);
        }

        let mut channels: FxHashMap<String, BoneChannels> = FxHashMap::default();
        for (i, sample) in record.samples.iter().enumerate() {
            let bone = cycle_names[i % record.node_count];
            let entry = channels.entry(bone.to_string()).or_insert_with(|| {
                BoneChannels {
                    translations: Vec::with_capacity(record.frame_count),
                    rotations: Vec::with_capacity(record.frame_count),
                }
            });
            entry.translations.push(sample.position);
            entry.rotations.push(sample.rotation);
        }

        Ok(Self {
            name: record.name.clone(),
            skeleton_checksum: record.checksum,
            frame_count: record.frame_count,
            native_rate: record.native_rate,
            source_rate: record.source_rate,
            layer: record.layer,
            control,
            channels,
        })
    }

}

/// Splits a fragment name into `(namespace, local_name)`.
///
/// Exactly two dash-separated parts are required; anything else is a hard
/// failure since every grouping and output-layout decision hangs off this
/// split.
pub fn split_fragment_name(name: &str) -> Result<(&str, &str)> {
    let mut parts = name.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ns), Some(local), None) if !ns.is_empty() && !local.is_empty() => Ok((ns, local)),
        _ => Err(RelicError::FragmentName {
            name: name.to_string(),
        }),
    }
}
