//! End-to-end pipeline tests
//!
//! Tests for:
//! - Full runs from typed records to exchange documents
//! - Output key layout, including the error suffix on gapped sequences
//! - Soft-condition accounting (skipped records, duplicates, directives)
//! - Hard failures on corrupt names and output collisions
//! - The collision-refusing filesystem sink

use glam::{Mat4, Quat, Vec3};
use relic::errors::RelicError;
use relic::output::ExportTree;
use relic::records::{Aabb, AnimationRecord, HierarchyNode, HierarchyRecord, RawSample};
use relic::{Pipeline, SequenceDocument};

// ============================================================================
// Helpers
// ============================================================================

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hierarchy(checksum: u32) -> HierarchyRecord {
    HierarchyRecord {
        checksum,
        source_path: "ANIMS\\HUMANS.MDH".to_string(),
        root_translation: Vec3::ZERO,
        bbox: Aabb::new(Vec3::splat(-50.0), Vec3::splat(50.0)),
        collision_bbox: Aabb::new(Vec3::splat(-40.0), Vec3::splat(40.0)),
        nodes: vec![
            HierarchyNode {
                name: "BIP01".to_string(),
                parent_index: -1,
                transform: Mat4::IDENTITY,
            },
            HierarchyNode {
                name: "BIP01 SPINE".to_string(),
                parent_index: 0,
                transform: Mat4::from_translation(Vec3::new(0.0, 20.0, 0.0)),
            },
        ],
    }
}

fn animation(
    name: &str,
    checksum: u32,
    frame_count: usize,
    base_id: &str,
    frame_range: (i32, i32),
) -> AnimationRecord {
    let directive = format!(
        r#"ANI "{name}" 1 "" 0.1 0.1 M. "{base_id}.ASC" F {} {}"#,
        frame_range.0, frame_range.1
    );

    let node_indices = vec![0, 1];
    let samples = (0..frame_count * node_indices.len())
        .map(|i| RawSample {
            position: Vec3::new(i as f32, 0.0, 0.0),
            rotation: Quat::IDENTITY,
        })
        .collect();

    AnimationRecord {
        name: name.to_string(),
        checksum,
        frame_count,
        native_rate: 25.0,
        source_rate: 25.0,
        layer: 1,
        node_count: 2,
        node_indices,
        samples,
        directive,
        source_path: format!("ANIMS\\{base_id}.MAN"),
    }
}

/// A record whose directive is structurally unusable (kept as a clip only).
fn undirected_animation(name: &str, checksum: u32) -> AnimationRecord {
    let mut record = animation(name, checksum, 4, "UNUSED", (0, 3));
    record.directive = String::new();
    record
}

// ============================================================================
// Full Runs
// ============================================================================

#[test]
fn run_emits_clips_and_merged_sequence() {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-S_RUNL", 7, 10, "HUM_RUN_M01", (0, 9)))
        .unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-T_RUN_STOP", 7, 10, "HUM_RUN_M01", (10, 19)))
        .unwrap();

    let output = pipeline.finish().unwrap();

    let keys: Vec<&str> = output.documents.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        [
            "clips/HUMANS/S_RUNL.clip.json",
            "clips/HUMANS/T_RUN_STOP.clip.json",
            "sequences/HUMANS/HUM_RUN_M01.seq.json",
        ]
    );

    assert_eq!(output.stats.skeletons, 1);
    assert_eq!(output.stats.fragments, 2);
    assert_eq!(output.stats.merged_sequences, 1);
    assert_eq!(output.stats.sequences_with_gaps, 0);

    let (_, merged) = &output.sequences[0];
    assert_eq!(merged.frame_count, 20);
    assert!((merged.fps - 25.0).abs() < f32::EPSILON);

    // The merged document carries the skeleton and every animated bone.
    let doc = &output.documents[2].1;
    assert_eq!(doc.skeleton_data.nodes.len(), 2);
    assert_eq!(doc.animation_data.frame_count, 20);
    assert_eq!(doc.animation_data.frames.len(), 2);
    assert_eq!(doc.animation_data.frames["BIP01"].translation.len(), 20);
}

#[test]
fn gapped_sequence_gets_error_suffix() {
    init_logs();
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-S_RUNL", 7, 10, "HUM_RUN_M01", (0, 9)))
        .unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-T_RUN_STOP", 7, 6, "HUM_RUN_M01", (15, 20)))
        .unwrap();

    let output = pipeline.finish().unwrap();

    assert!(
        output
            .documents
            .iter()
            .any(|(k, _)| k == "sequences/HUMANS/HUM_RUN_M01_ERROR.seq.json")
    );
    assert_eq!(output.stats.sequences_with_gaps, 1);
    assert_eq!(output.sequences[0].1.missing_frames, vec![10, 11, 12, 13, 14]);
}

#[test]
fn unresolvable_checksum_is_skipped_softly() {
    init_logs();
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-S_RUNL", 99, 10, "HUM_RUN_M01", (0, 9)))
        .unwrap();

    let output = pipeline.finish().unwrap();
    assert_eq!(output.stats.skipped_animations, 1);
    assert_eq!(output.stats.fragments, 0);
    assert!(output.documents.is_empty());
}

#[test]
fn directiveless_record_stays_standalone() {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&undirected_animation("HUMANS-T_POSE", 7))
        .unwrap();

    let output = pipeline.finish().unwrap();
    assert_eq!(output.stats.absent_directives, 1);
    assert_eq!(output.stats.merged_sequences, 0);

    let keys: Vec<&str> = output.documents.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, ["clips/HUMANS/T_POSE.clip.json"]);
}

#[test]
fn duplicate_fragment_names_keep_first() {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();

    let first = animation("HUMANS-S_RUNL", 7, 10, "HUM_RUN_M01", (0, 9));
    let second = animation("HUMANS-S_RUNL", 7, 4, "HUM_RUN_M01", (10, 13));
    pipeline.ingest_animation(&first).unwrap();
    pipeline.ingest_animation(&second).unwrap();

    let output = pipeline.finish().unwrap();
    assert_eq!(output.stats.duplicate_fragments, 1);

    let clip = output
        .documents
        .iter()
        .find(|(k, _)| k == "clips/HUMANS/S_RUNL.clip.json")
        .map(|(_, d)| d)
        .unwrap();
    assert_eq!(clip.animation_data.frame_count, 10);
}

#[test]
fn duplicate_hierarchy_is_counted_not_fatal() {
    init_logs();
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();

    let output = pipeline.finish().unwrap();
    assert_eq!(output.stats.skeletons, 1);
    assert_eq!(output.stats.duplicate_hierarchies, 1);
}

// ============================================================================
// Hard Failures
// ============================================================================

#[test]
fn malformed_fragment_name_aborts() {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();

    let err = pipeline
        .ingest_animation(&animation("NODASH", 7, 10, "HUM_RUN_M01", (0, 9)))
        .unwrap_err();
    assert!(matches!(err, RelicError::FragmentName { .. }));
}

#[test]
fn corrupt_sample_stream_aborts() {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();

    let mut record = animation("HUMANS-S_RUNL", 7, 10, "HUM_RUN_M01", (0, 9));
    record.samples.pop();
    let err = pipeline.ingest_animation(&record).unwrap_err();
    assert!(matches!(err, RelicError::SampleCountMismatch { .. }));
}

// ============================================================================
// Filesystem Sink
// ============================================================================

fn sample_document() -> SequenceDocument {
    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-S_RUNL", 7, 4, "HUM_RUN_M01", (0, 3)))
        .unwrap();
    let output = pipeline.finish().unwrap();
    output.documents[0].1.clone()
}

#[test]
fn export_tree_writes_documents() {
    let dir = tempfile::tempdir().unwrap();
    let tree = ExportTree::new(dir.path());

    let doc = sample_document();
    let path = tree.write("clips/HUMANS/S_RUNL.clip.json", &doc).unwrap();
    assert!(path.exists());

    let text = std::fs::read_to_string(&path).unwrap();
    let parsed: SequenceDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.animation_data.name, doc.animation_data.name);
}

#[test]
fn export_tree_refuses_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let tree = ExportTree::new(dir.path());
    let doc = sample_document();

    tree.write("clips/HUMANS/S_RUNL.clip.json", &doc).unwrap();
    let err = tree.write("clips/HUMANS/S_RUNL.clip.json", &doc).unwrap_err();
    assert!(matches!(err, RelicError::OutputFileExists { .. }));
}

#[test]
fn write_all_lays_out_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    let tree = ExportTree::new(dir.path());

    let mut pipeline = Pipeline::new();
    pipeline.ingest_hierarchy(&hierarchy(7)).unwrap();
    pipeline
        .ingest_animation(&animation("HUMANS-S_RUNL", 7, 10, "HUM_RUN_M01", (0, 9)))
        .unwrap();
    let output = pipeline.finish().unwrap();

    output.write_all(&tree).unwrap();
    assert!(dir.path().join("clips/HUMANS/S_RUNL.clip.json").exists());
    assert!(
        dir.path()
            .join("sequences/HUMANS/HUM_RUN_M01.seq.json")
            .exists()
    );
}
