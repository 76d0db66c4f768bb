//! Cross-rate resampler tests
//!
//! Tests for:
//! - Duration preservation across rate changes (24 -> 30 over 25 frames)
//! - Identity at equal rates
//! - Endpoint fidelity and linear-channel exactness
//! - Degenerate short-clip clamping
//! - Quaternion renormalization

use glam::{Quat, Vec3};
use relic::sequence::resample::{resample_quat, resample_vec3, target_frame_count};

const EPSILON: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Frame Count & Duration
// ============================================================================

#[test]
fn duration_is_preserved_24_to_30() {
    // 25 frames at 24 fps span exactly 1.0 s; at 30 fps that same second
    // must come out as 31 frames.
    assert_eq!(target_frame_count(25, 24.0, 30.0), 31);

    let frames: Vec<Vec3> = (0..25).map(|i| Vec3::splat(i as f32)).collect();
    let resampled = resample_vec3(&frames, 24.0, 30.0);

    assert_eq!(resampled.len(), 31);
    // Endpoints pin the original duration: last output frame equals the
    // last input frame.
    assert!(approx(resampled[0].x, 0.0));
    assert!(approx(resampled[30].x, 24.0));
}

#[test]
fn upsampling_10_to_25() {
    assert_eq!(target_frame_count(40, 10.0, 25.0), 100);
}

#[test]
fn equal_rates_are_identity() {
    let frames: Vec<Vec3> = (0..12)
        .map(|i| Vec3::new(i as f32, (i * i) as f32 * 0.1, -(i as f32)))
        .collect();

    let resampled = resample_vec3(&frames, 25.0, 25.0);

    assert_eq!(resampled.len(), frames.len());
    for (a, b) in resampled.iter().zip(&frames) {
        assert!(approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z));
    }
}

#[test]
fn linear_channel_stays_linear() {
    // A straight-line channel must survive the spline untouched at any rate.
    let frames: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f32 * 2.0, 0.0, 0.0)).collect();
    let resampled = resample_vec3(&frames, 10.0, 30.0);

    assert_eq!(resampled.len(), 30);
    let duration = 9.0 / 10.0;
    let step = duration / (resampled.len() - 1) as f32;
    for (j, v) in resampled.iter().enumerate() {
        let t = j as f32 * step;
        assert!(approx(v.x, 20.0 * t), "at frame {j}: {} vs {}", v.x, 20.0 * t);
    }
}

#[test]
fn degenerate_clip_keeps_two_frames() {
    let frames = vec![Vec3::splat(5.0), Vec3::splat(6.0)];
    let resampled = resample_vec3(&frames, 25.0, 10.0);

    assert_eq!(resampled.len(), 2);
    assert!(approx(resampled[0].x, 5.0));
    assert!(approx(resampled[1].x, 6.0));
}

#[test]
fn empty_channel_stays_empty() {
    assert!(resample_vec3(&[], 10.0, 25.0).is_empty());
}

// ============================================================================
// Rotation Channels
// ============================================================================

#[test]
fn resampled_rotations_are_unit_length() {
    let frames: Vec<Quat> = (0..8)
        .map(|i| Quat::from_rotation_y(i as f32 * 0.2))
        .collect();

    let resampled = resample_quat(&frames, 10.0, 25.0);

    assert_eq!(resampled.len(), 20);
    for q in &resampled {
        assert!(approx(q.length(), 1.0));
    }
    // Endpoints reproduce the source rotations.
    assert!(resampled[0].angle_between(frames[0]) < EPSILON);
    assert!(resampled[19].angle_between(frames[7]) < EPSILON);
}
