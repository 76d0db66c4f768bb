//! Base-sequence grouping and frame-continuity checking.
//!
//! Fragments that carry a control block are collected into groups keyed by
//! `(namespace, base_sequence_id)`. Finalizing a group orders its fragments
//! by authored start frame, enforces the common-canonical-rate invariant,
//! and walks consecutive frame ranges to collect missing frames.

use rustc_hash::FxHashMap;

use crate::errors::{RelicError, Result};
use crate::sequence::fragment::{AnimationFragment, split_fragment_name};

/// One base sequence's fragments, ordered by start frame after
/// finalization.
#[derive(Debug)]
pub struct SequenceGroup {
    pub namespace: String,
    pub base_sequence_id: String,
    pub fragments: Vec<AnimationFragment>,
    /// Frame indices absent between consecutive fragments; filled during
    /// finalization. Non-empty gaps are a reporting signal, not an error;
    /// some shipped content legitimately has authoring holes.
    pub missing_frames: Vec<i32>,
}

impl SequenceGroup {
    /// `namespace/base_sequence_id`, the group's display identity.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.base_sequence_id)
    }

    /// Sorts fragments, validates rate uniformity, and collects gaps.
    fn finalize(&mut self) -> Result<()> {
        self.fragments
            .sort_by_key(|f| f.control.as_ref().map_or(0, |c| c.start_frame));

        let common_rate = self.fragments[0].source_rate;
        for fragment in &self.fragments[1..] {
            if (fragment.source_rate - common_rate).abs() > f32::EPSILON {
                return Err(RelicError::MixedGroupRate {
                    group: self.key(),
                    expected: common_rate,
                    found: fragment.source_rate,
                    fragment: fragment.name.clone(),
                });
            }
        }

        self.missing_frames.clear();
        for pair in self.fragments.windows(2) {
            let (Some(prev), Some(next)) = (pair[0].control.as_ref(), pair[1].control.as_ref())
            else {
                continue;
            };
            if prev.end_frame + 1 != next.start_frame {
                self.missing_frames
                    .extend(prev.end_frame + 1..next.start_frame);
            }
        }

        if !self.missing_frames.is_empty() {
            log::warn!(
                "Base sequence {} has missing frames: {:?}",
                self.key(),
                self.missing_frames
            );
        }

        Ok(())
    }
}

/// Accumulator for all base-sequence groups of one pipeline run.
#[derive(Debug, Default)]
pub struct SequenceGroups {
    groups: FxHashMap<(String, String), SequenceGroup>,
}

impl SequenceGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a fragment under its `(namespace, base_sequence_id)` group.
    ///
    /// The fragment must carry a control block; fragments without one stay
    /// standalone and never reach the aggregator. Hard-fails if the fragment
    /// name violates the two-part contract.
    pub fn insert(&mut self, fragment: AnimationFragment) -> Result<()> {
        debug_assert!(fragment.control.is_some());

        let (namespace, _) = split_fragment_name(&fragment.name)?;
        let base_id = fragment
            .control
            .as_ref()
            .map(|c| c.base_sequence_id.clone())
            .unwrap_or_default();

        self.groups
            .entry((namespace.to_string(), base_id))
            .or_insert_with_key(|(ns, id)| SequenceGroup {
                namespace: ns.clone(),
                base_sequence_id: id.clone(),
                fragments: Vec::new(),
                missing_frames: Vec::new(),
            })
            .fragments
            .push(fragment);

        Ok(())
    }

    /// Number of groups collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Finalizes every group: ordering, rate validation, gap detection.
    ///
    /// Groups are returned sorted by key so downstream output is
    /// deterministic.
    pub fn finish(self) -> Result<Vec<SequenceGroup>> {
        let mut groups: Vec<SequenceGroup> = self.groups.into_values().collect();
        groups.sort_by(|a, b| {
            (a.namespace.as_str(), a.base_sequence_id.as_str())
                .cmp(&(b.namespace.as_str(), b.base_sequence_id.as_str()))
        });
        for group in &mut groups {
            group.finalize()?;
        }
        Ok(groups)
    }
}
