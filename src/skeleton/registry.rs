//! Checksum-keyed skeleton registry.
//!
//! One canonical skeleton per checksum: the first hierarchy record seen for a
//! checksum wins, later records for the same checksum are ignored and
//! counted. Write-once-per-key within one pipeline run.

use rustc_hash::FxHashMap;

use crate::errors::Result;
use crate::records::HierarchyRecord;
use crate::skeleton::Skeleton;

#[derive(Debug, Default)]
pub struct SkeletonRegistry {
    skeletons: FxHashMap<u32, Skeleton>,
    duplicates: usize,
}

impl SkeletonRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a hierarchy record. Returns `true` if the record contributed
    /// a new skeleton, `false` if its checksum was already known.
    pub fn register(&mut self, record: &HierarchyRecord) -> Result<bool> {
        if self.skeletons.contains_key(&record.checksum) {
            log::debug!(
                "Skeleton checksum {:#010x} already registered, ignoring {}",
                record.checksum,
                record.source_path
            );
            self.duplicates += 1;
            return Ok(false);
        }

        let skeleton = Skeleton::from_record(record)?;
        log::debug!(
            "Registered skeleton {} ({} nodes) for checksum {:#010x}",
            skeleton.name,
            skeleton.nodes.len(),
            record.checksum
        );
        self.skeletons.insert(record.checksum, skeleton);
        Ok(true)
    }

    /// Looks up the canonical skeleton for a checksum.
    #[inline]
    #[must_use]
    pub fn get(&self, checksum: u32) -> Option<&Skeleton> {
        self.skeletons.get(&checksum)
    }

    /// Number of distinct skeletons registered.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.skeletons.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skeletons.is_empty()
    }

    /// Number of ignored duplicate hierarchy records.
    #[inline]
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
