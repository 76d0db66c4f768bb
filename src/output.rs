//! Exchange documents and the output tree.
//!
//! Every reconstructed clip or merged base sequence is emitted as one JSON
//! document pairing the skeleton it binds to with the per-bone frame data.
//! Rotations are serialized in `w, x, y, z` order throughout.
//!
//! The filesystem sink refuses to overwrite: two documents resolving to the
//! same path within or across runs is always a bug in the grouping contract,
//! never something to paper over.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::errors::{RelicError, Result};
use crate::sequence::merge::ReconstructedSequence;
use crate::skeleton::Skeleton;

/// Suffix carried by merged-sequence filenames with frame gaps.
const ERROR_SUFFIX: &str = "_ERROR";

// ============================================================================
// Document model
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundsData {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub name: String,
    pub parent_name: String,
    pub translation: [f32; 3],
    /// `w, x, y, z`
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkeletonData {
    pub source_path: String,
    pub root_translation: [f32; 3],
    pub bbox: BoundsData,
    pub collision_bbox: BoundsData,
    pub nodes: Vec<NodeData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelData {
    pub translation: Vec<[f32; 3]>,
    /// `w, x, y, z` per frame
    pub rotation: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationData {
    pub name: String,
    pub frame_count: usize,
    pub fps: f32,
    /// Bone name -> channels; ordered for deterministic output.
    pub frames: BTreeMap<String, ChannelData>,
}

/// One exchange document: a sequence (or standalone clip) together with the
/// skeleton it was reconstructed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceDocument {
    pub skeleton_data: SkeletonData,
    pub animation_data: AnimationData,
}

impl SequenceDocument {
    /// Builds the document for one sequence bound to `skeleton`.
    #[must_use]
    pub fn build(skeleton: &Skeleton, sequence: &ReconstructedSequence) -> Self {
        let nodes = skeleton
            .nodes
            .iter()
            .map(|n| NodeData {
                name: n.name.clone(),
                parent_name: n.parent_name.clone(),
                translation: n.translation.to_array(),
                rotation: quat_wxyz(n.rotation),
                scale: n.scale.to_array(),
            })
            .collect();

        let skeleton_data = SkeletonData {
            source_path: skeleton.source_path.clone(),
            root_translation: skeleton.root_translation.to_array(),
            bbox: BoundsData {
                min: skeleton.bbox.min.to_array(),
                max: skeleton.bbox.max.to_array(),
            },
            collision_bbox: BoundsData {
                min: skeleton.collision_bbox.min.to_array(),
                max: skeleton.collision_bbox.max.to_array(),
            },
            nodes,
        };

        let frames = sequence
            .channels
            .iter()
            .map(|(bone, channels)| {
                (
                    bone.clone(),
                    ChannelData {
                        translation: channels.translations.iter().map(|t| t.to_array()).collect(),
                        rotation: channels.rotations.iter().copied().map(quat_wxyz).collect(),
                    },
                )
            })
            .collect();

        let animation_data = AnimationData {
            name: sequence.name.clone(),
            frame_count: sequence.frame_count,
            fps: sequence.fps,
            frames,
        };

        Self {
            skeleton_data,
            animation_data,
        }
    }
}

fn quat_wxyz(q: Quat) -> [f32; 4] {
    [q.w, q.x, q.y, q.z]
}

// ============================================================================
// Output layout
// ============================================================================

/// Relative output path for a standalone clip: per-skeleton-namespace
/// subfolders.
#[must_use]
pub fn clip_output_key(namespace: &str, local_name: &str) -> String {
    format!("clips/{namespace}/{local_name}.clip.json")
}

/// Relative output path for a merged base sequence: per-namespace
/// subfolders, with the error suffix when the group had frame gaps.
#[must_use]
pub fn sequence_output_key(namespace: &str, base_sequence_id: &str, has_gaps: bool) -> String {
    let suffix = if has_gaps { ERROR_SUFFIX } else { "" };
    format!("sequences/{namespace}/{base_sequence_id}{suffix}.seq.json")
}

// ============================================================================
// Filesystem sink
// ============================================================================

/// Writes documents under one root directory, refusing collisions.
#[derive(Debug)]
pub struct ExportTree {
    root: PathBuf,
}

impl ExportTree {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serializes `document` to `<root>/<relative_key>`.
    ///
    /// Hard-fails if the target file already exists.
    pub fn write(&self, relative_key: &str, document: &SequenceDocument) -> Result<PathBuf> {
        let path = self.root.join(relative_key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    RelicError::OutputFileExists { path: path.clone() }
                } else {
                    RelicError::IoError(e)
                }
            })?;

        serde_json::to_writer_pretty(BufWriter::new(file), document)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_keys_follow_layout() {
        assert_eq!(
            clip_output_key("HUMANS", "S_RUNL"),
            "clips/HUMANS/S_RUNL.clip.json"
        );
        assert_eq!(
            sequence_output_key("HUMANS", "HUM_RUNLOOP_M01", false),
            "sequences/HUMANS/HUM_RUNLOOP_M01.seq.json"
        );
        assert_eq!(
            sequence_output_key("HUMANS", "HUM_RUNLOOP_M01", true),
            "sequences/HUMANS/HUM_RUNLOOP_M01_ERROR.seq.json"
        );
    }
}
