//! Typed archive records.
//!
//! The archive/virtual-file-system collaborator decodes raw binary assets
//! into these structures before handing them to the pipeline. The pipeline
//! never sees undecoded bytes; format validation is the decoder's job.

use glam::{Mat4, Quat, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// One joint of a decoded hierarchy record.
///
/// `transform` is the node's parent-relative bind transform, column-major as
/// stored in the archive (glam's native layout).
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub name: String,
    /// Index of the parent node in the record's node array, -1 for roots.
    pub parent_index: i32,
    pub transform: Mat4,
}

/// One decoded model-hierarchy record: the bind-pose joint tree of a rig.
#[derive(Debug, Clone)]
pub struct HierarchyRecord {
    /// Content checksum; the canonical identity of the skeleton.
    pub checksum: u32,
    /// Archive-internal source path, e.g. `ANIMS\HUMANS.MDH`.
    pub source_path: String,
    pub root_translation: Vec3,
    pub bbox: Aabb,
    pub collision_bbox: Aabb,
    /// Ordered node array; parents always precede their children.
    pub nodes: Vec<HierarchyNode>,
}

/// One raw animation sample: a parent-local translation and rotation.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    pub position: Vec3,
    pub rotation: Quat,
}

/// One decoded model-animation record.
///
/// The sample stream is frame-major/bone-minor: a full cycle of `node_count`
/// samples makes up one frame, and `node_indices` maps the position within a
/// cycle to a node index of the skeleton identified by `checksum`.
#[derive(Debug, Clone)]
pub struct AnimationRecord {
    /// Two-part record name, `<namespace>-<local_name>`.
    pub name: String,
    /// Checksum of the skeleton this animation was captured against.
    pub checksum: u32,
    pub frame_count: usize,
    /// The rate the samples were captured at.
    pub native_rate: f32,
    /// The canonical rate of the base sequence this fragment belongs to.
    pub source_rate: f32,
    pub layer: u32,
    pub node_count: usize,
    /// Cycle position -> skeleton node index; length must equal `node_count`.
    pub node_indices: Vec<usize>,
    /// Flat interleaved sample stream; length must equal
    /// `node_count * frame_count`.
    pub samples: Vec<RawSample>,
    /// Embedded textual directive, possibly empty or malformed.
    pub directive: String,
    /// Archive-internal source path, e.g. `ANIMS\HUM_RUNLOOP_M01.MAN`.
    pub source_path: String,
}
