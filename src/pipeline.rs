//! The reconstruction pipeline.
//!
//! One [`Pipeline`] value is one run: it owns the skeleton registry and the
//! document set, both write-once-per-key, with a lifetime of exactly one
//! pass over the archive. Feed it every decoded hierarchy record, then every
//! decoded animation record, then call [`Pipeline::finish`].
//!
//! Hard failures (corrupt structure) abort immediately through `Result`;
//! recoverable conditions are logged and tallied in [`RunStats`] so a run
//! can report what it skipped without drowning the caller in noise.

use rustc_hash::FxHashSet;

use crate::errors::{RelicError, Result};
use crate::output::{SequenceDocument, clip_output_key, sequence_output_key};
use crate::records::{AnimationRecord, HierarchyRecord};
use crate::sequence::group::SequenceGroups;
use crate::sequence::merge::ReconstructedSequence;
use crate::sequence::{AnimationFragment, parse_directive, split_fragment_name};
use crate::skeleton::SkeletonRegistry;

/// Tallies of one run's soft conditions and results.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    /// Distinct skeletons registered.
    pub skeletons: usize,
    /// Hierarchy records ignored because their checksum was already known.
    pub duplicate_hierarchies: usize,
    /// Fragments demultiplexed and kept.
    pub fragments: usize,
    /// Animation records skipped for lack of a resolvable skeleton.
    pub skipped_animations: usize,
    /// Fragments whose name was already taken (first one wins).
    pub duplicate_fragments: usize,
    /// Records with a missing or structurally unusable directive.
    pub absent_directives: usize,
    /// Total leniency fallbacks taken across all parsed directives.
    pub directive_warnings: usize,
    /// Base sequences merged.
    pub merged_sequences: usize,
    /// Merged sequences that carried frame gaps.
    pub sequences_with_gaps: usize,
}

/// Everything one finished run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    /// `(relative output key, document)` pairs, collision-checked and sorted
    /// by key.
    pub documents: Vec<(String, SequenceDocument)>,
    /// Merged base sequences with their skeleton checksums, for in-process
    /// consumers driving the pose reconstructor directly.
    pub sequences: Vec<(u32, ReconstructedSequence)>,
    /// The resolved skeleton registry.
    pub skeletons: SkeletonRegistry,
    pub stats: RunStats,
}

impl PipelineOutput {
    /// Writes every document through the given sink.
    pub fn write_all(&self, tree: &crate::output::ExportTree) -> Result<()> {
        for (key, document) in &self.documents {
            tree.write(key, document)?;
        }
        Ok(())
    }
}

/// One reconstruction run over an archive's records.
#[derive(Default)]
pub struct Pipeline {
    skeletons: SkeletonRegistry,
    groups: SequenceGroups,
    documents: Vec<(String, SequenceDocument)>,
    document_keys: FxHashSet<String>,
    clip_names: FxHashSet<String>,
    stats: RunStats,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the skeletons resolved so far.
    #[inline]
    #[must_use]
    pub fn skeletons(&self) -> &SkeletonRegistry {
        &self.skeletons
    }

    /// Registers a hierarchy record. Duplicate checksums are ignored.
    pub fn ingest_hierarchy(&mut self, record: &HierarchyRecord) -> Result<()> {
        self.skeletons.register(record)?;
        Ok(())
    }

    /// Demultiplexes one animation record, emits its standalone clip
    /// document, and files it for base-sequence grouping when it carries a
    /// usable directive.
    pub fn ingest_animation(&mut self, record: &AnimationRecord) -> Result<()> {
        let (namespace, local_name) = split_fragment_name(&record.name)?;

        let Some(skeleton) = self.skeletons.get(record.checksum) else {
            log::warn!(
                "No skeleton for checksum {:#010x}, skipping animation {}",
                record.checksum,
                record.name
            );
            self.stats.skipped_animations += 1;
            return Ok(());
        };

        let control = match parse_directive(&record.directive) {
            Some(parsed) => {
                for warning in &parsed.warnings {
                    log::debug!("Directive of {}: {}", record.name, warning);
                }
                self.stats.directive_warnings += parsed.warnings.len();
                Some(parsed.block)
            }
            None => {
                log::debug!("No usable directive in {}", record.name);
                self.stats.absent_directives += 1;
                None
            }
        };

        let fragment = AnimationFragment::demultiplex(record, skeleton, control)?;
        self.stats.fragments += 1;

        // Standalone clip document; the first fragment under a name wins.
        if self.clip_names.insert(fragment.name.clone()) {
            let clip_view = ReconstructedSequence::from_fragment(&fragment, namespace);
            let document = SequenceDocument::build(skeleton, &clip_view);
            self.push_document(clip_output_key(namespace, local_name), document)?;
        } else {
            log::debug!("Duplicate fragment name {}, keeping first", fragment.name);
            self.stats.duplicate_fragments += 1;
        }

        if fragment.control.is_some() {
            self.groups.insert(fragment)?;
        }

        Ok(())
    }

    /// Finalizes grouping, merges every base sequence, and hands back the
    /// full document set.
    pub fn finish(mut self) -> Result<PipelineOutput> {
        let groups = std::mem::take(&mut self.groups).finish()?;

        let mut sequences = Vec::with_capacity(groups.len());
        for group in &groups {
            let checksum = group.fragments[0].skeleton_checksum;
            let Some(skeleton) = self.skeletons.get(checksum) else {
                // Fragments only enter grouping after their skeleton
                // resolved; a miss means the registry was tampered with.
                log::error!("Skeleton {checksum:#010x} vanished for group {}", group.key());
                continue;
            };

            let merged = ReconstructedSequence::merge(group);
            let has_gaps = !merged.missing_frames.is_empty();
            if has_gaps {
                self.stats.sequences_with_gaps += 1;
            }

            let key = sequence_output_key(&merged.namespace, &merged.name, has_gaps);
            let document = SequenceDocument::build(skeleton, &merged);
            self.push_document(key, document)?;

            sequences.push((checksum, merged));
            self.stats.merged_sequences += 1;
        }

        self.stats.skeletons = self.skeletons.len();
        self.stats.duplicate_hierarchies = self.skeletons.duplicates();

        self.documents.sort_by(|a, b| a.0.cmp(&b.0));

        let stats = self.stats;
        log::info!(
            "Run complete: {} skeletons ({} duplicates ignored), {} fragments \
             ({} skipped, {} duplicate names, {} without directive), {} merged \
             sequences ({} with frame gaps)",
            stats.skeletons,
            stats.duplicate_hierarchies,
            stats.fragments,
            stats.skipped_animations,
            stats.duplicate_fragments,
            stats.absent_directives,
            stats.merged_sequences,
            stats.sequences_with_gaps,
        );

        Ok(PipelineOutput {
            documents: self.documents,
            sequences,
            skeletons: self.skeletons,
            stats,
        })
    }

    fn push_document(&mut self, key: String, document: SequenceDocument) -> Result<()> {
        if !self.document_keys.insert(key.clone()) {
            return Err(RelicError::DuplicateOutput { key });
        }
        self.documents.push((key, document));
        Ok(())
    }
}
