//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`RelicError`] covers every hard-failure mode of the
//! reconstruction pipeline. Hard failures indicate corrupt or structurally
//! invalid archive input and abort the whole run; each variant carries the
//! offending identifier (fragment, skeleton, or bone name) so the failure can
//! be traced back to a source record. Recoverable conditions are not errors;
//! they are logged and counted by the pipeline instead.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RelicError>`.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the reconstruction pipeline.
///
/// Every variant represents a hard failure: the archive content is corrupt or
/// violates a structural contract, and continuing would silently produce
/// wrong output.
#[derive(Error, Debug)]
pub enum RelicError {
    // ========================================================================
    // Record Structure Errors
    // ========================================================================
    /// An animation record's name is not exactly two dash-separated parts.
    /// The `<namespace>-<local_name>` contract is load-bearing for grouping.
    #[error("Animation name {name:?} is not of the form <namespace>-<local_name>")]
    FragmentName {
        /// The offending record name
        name: String,
    },

    /// The flat sample array length does not equal `node_count * frame_count`.
    #[error("Sample count mismatch in {name:?}: expected {expected}, got {actual}")]
    SampleCountMismatch {
        /// The offending record name
        name: String,
        /// `node_count * frame_count`
        expected: usize,
        /// Actual sample array length
        actual: usize,
    },

    /// The `node_indices` array length does not equal `node_count`.
    #[error("Node index table mismatch in {name:?}: expected {expected} entries, got {actual}")]
    NodeTableMismatch {
        /// The offending record name
        name: String,
        /// The record's declared `node_count`
        expected: usize,
        /// Actual `node_indices` length
        actual: usize,
    },

    /// A sample's node index does not resolve in the bound skeleton.
    #[error("Node index {index} in {name:?} is out of bounds for skeleton with {node_count} nodes")]
    NodeIndexOutOfBounds {
        /// The offending record name
        name: String,
        /// The unresolvable node index
        index: usize,
        /// Number of nodes in the bound skeleton
        node_count: usize,
    },

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A hierarchy node's parent index is not a back-reference to an earlier
    /// node (forward reference, self reference, or out of range).
    #[error("Node {node:?} in skeleton {skeleton:?} has invalid parent index {parent_index}")]
    InvalidParentIndex {
        /// The skeleton's derived name
        skeleton: String,
        /// The offending node name
        node: String,
        /// The invalid parent index
        parent_index: i32,
    },

    // ========================================================================
    // Grouping Errors
    // ========================================================================
    /// Fragments of one base-sequence group disagree on the canonical rate.
    #[error(
        "Fragment {fragment:?} in group {group:?} has source rate {found}, expected {expected}"
    )]
    MixedGroupRate {
        /// The `(namespace, base_sequence_id)` group, rendered `ns/id`
        group: String,
        /// The group's established canonical rate
        expected: f32,
        /// The disagreeing fragment's rate
        found: f32,
        /// The disagreeing fragment's name
        fragment: String,
    },

    // ========================================================================
    // Output Errors
    // ========================================================================
    /// Two documents resolved to the same output key within one run.
    #[error("Duplicate output key {key:?}")]
    DuplicateOutput {
        /// The colliding relative output path
        key: String,
    },

    /// An output file already exists on disk. Collisions are always a bug and
    /// are never overwritten.
    #[error("Output file already exists: {path}")]
    OutputFileExists {
        /// The colliding absolute path
        path: PathBuf,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, RelicError>`.
pub type Result<T> = std::result::Result<T, RelicError>;
