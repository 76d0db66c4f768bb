//! Bind-pose skeleton model.
//!
//! A [`Skeleton`] is the decoded, decomposed form of one hierarchy record:
//! an ordered joint list where every node's parent precedes it, with each
//! node's parent-relative bind transform split into translation, rotation
//! and scale.

use glam::{Quat, Vec3};

use crate::errors::{RelicError, Result};
use crate::records::{Aabb, HierarchyRecord};

/// Decomposition noise window: scale components inside this open interval are
/// snapped to exactly 1.0.
const SCALE_SNAP_MIN: f32 = 0.99998;
const SCALE_SNAP_MAX: f32 = 1.0001;

/// One skeleton joint with its decomposed parent-relative bind transform.
#[derive(Debug, Clone)]
pub struct SkeletonNode {
    pub name: String,
    /// Index of the parent node, -1 for roots. Always a back-reference.
    pub parent_index: i32,
    /// Resolved parent name; empty for roots.
    pub parent_name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    /// Unit for all practical rigs; near-unit components are snapped to 1.0.
    pub scale: Vec3,
}

impl SkeletonNode {
    /// Whether this node is a hierarchy root.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_index < 0
    }
}

/// One bind-pose hierarchy, immutable once built.
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// Content checksum, the canonical identity used to bind animations.
    pub checksum: u32,
    /// Short name derived from the source path (file stem).
    pub name: String,
    pub source_path: String,
    pub root_translation: Vec3,
    pub bbox: Aabb,
    pub collision_bbox: Aabb,
    /// Ordered joints; parents always precede children.
    pub nodes: Vec<SkeletonNode>,
}

impl Skeleton {
    /// Builds a skeleton from a decoded hierarchy record.
    ///
    /// Decomposes each node's bind matrix, snaps near-unit scale, and
    /// resolves parent names. Fails if any node's parent index is not a
    /// back-reference into the node list.
    pub fn from_record(record: &HierarchyRecord) -> Result<Self> {
        let name = source_stem(&record.source_path).to_string();

        let mut nodes = Vec::with_capacity(record.nodes.len());
        for (index, raw) in record.nodes.iter().enumerate() {
            let parent_name = if raw.parent_index < 0 {
                String::new()
            } else {
                let parent = usize::try_from(raw.parent_index).unwrap_or(usize::MAX);
                if parent >= index {
                    return Err(RelicError::InvalidParentIndex {
                        skeleton: name.clone(),
                        node: raw.name.clone(),
                        parent_index: raw.parent_index,
                    });
                }
                record.nodes[parent].name.clone()
            };

            let (scale, rotation, translation) = raw.transform.to_scale_rotation_translation();

            nodes.push(SkeletonNode {
                name: raw.name.clone(),
                parent_index: raw.parent_index,
                parent_name,
                translation,
                rotation,
                scale: snap_unit_scale(scale),
            });
        }

        Ok(Self {
            checksum: record.checksum,
            name,
            source_path: record.source_path.clone(),
            root_translation: record.root_translation,
            bbox: record.bbox,
            collision_bbox: record.collision_bbox,
            nodes,
        })
    }

    /// Node name for an archive node index, if in range.
    #[inline]
    #[must_use]
    pub fn node_name(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|n| n.name.as_str())
    }

    /// Case-insensitive node lookup, the match rule of the consumption
    /// contract.
    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<(usize, &SkeletonNode)> {
        self.nodes
            .iter()
            .enumerate()
            .find(|(_, n)| n.name.eq_ignore_ascii_case(name))
    }
}

/// Snaps scale components inside the decomposition noise window to 1.0.
fn snap_unit_scale(scale: Vec3) -> Vec3 {
    let snap = |v: f32| {
        if v > SCALE_SNAP_MIN && v < SCALE_SNAP_MAX {
            1.0
        } else {
            v
        }
    };
    Vec3::new(snap(scale.x), snap(scale.y), snap(scale.z))
}

/// File stem of an archive-internal path: last backslash-separated component,
/// up to the first dot.
fn source_stem(path: &str) -> &str {
    let file = path.rsplit('\\').next().unwrap_or(path);
    file.split('.').next().unwrap_or(file)
}
