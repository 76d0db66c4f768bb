//! Cross-rate channel resampling.
//!
//! Fragments captured at a rate different from their base sequence's
//! canonical rate are re-sampled onto that rate before concatenation, so a
//! merged sequence plays back at one uniform rate. Each vector component is
//! interpolated independently with a natural cubic spline; the new frame
//! grid spans exactly the original duration.

use glam::{Quat, Vec3};

use crate::math::CubicSpline;

/// New frame count when converting `source_frame_count` frames from
/// `source_rate` to `target_rate`, rounded to nearest.
///
/// Clamped to a minimum of 2: a one-frame target grid has no step width, so
/// very short clips always keep at least their endpoints.
#[must_use]
pub fn target_frame_count(source_frame_count: usize, source_rate: f32, target_rate: f32) -> usize {
    let scaled = (f64::from(target_rate) / f64::from(source_rate)) * source_frame_count as f64;
    (scaled.round() as usize).max(2)
}

/// Resamples one translation channel from `source_rate` to `target_rate`.
#[must_use]
pub fn resample_vec3(frames: &[Vec3], source_rate: f32, target_rate: f32) -> Vec<Vec3> {
    let components = resample_components::<3>(
        &frames.iter().map(|v| v.to_array()).collect::<Vec<_>>(),
        source_rate,
        target_rate,
    );
    components.into_iter().map(Vec3::from_array).collect()
}

/// Resamples one rotation channel from `source_rate` to `target_rate`.
///
/// Components are splined independently, which leaves the interpolated
/// quaternions slightly off unit length; each output frame is re-normalized.
#[must_use]
pub fn resample_quat(frames: &[Quat], source_rate: f32, target_rate: f32) -> Vec<Quat> {
    let components = resample_components::<4>(
        &frames.iter().map(|q| q.to_array()).collect::<Vec<_>>(),
        source_rate,
        target_rate,
    );
    components
        .into_iter()
        .map(|c| Quat::from_array(c).normalize())
        .collect()
}

/// Component-wise spline resampling of fixed-width vector frames.
///
/// The source grid places frame `i` at `i / source_rate`; the target grid
/// keeps the endpoints fixed (`duration = (n - 1) / source_rate`) and
/// divides the same span into `target_frame_count - 1` equal steps.
fn resample_components<const N: usize>(
    frames: &[[f32; N]],
    source_rate: f32,
    target_rate: f32,
) -> Vec<[f32; N]> {
    if frames.is_empty() {
        return Vec::new();
    }

    let source_count = frames.len();
    let target_count = target_frame_count(source_count, source_rate, target_rate);

    let source_step = 1.0 / source_rate;
    let duration = source_step * (source_count - 1) as f32;
    let target_step = duration / (target_count - 1) as f32;

    let times: Vec<f32> = (0..source_count).map(|i| i as f32 * source_step).collect();

    let mut result = vec![[0.0_f32; N]; target_count];
    for component in 0..N {
        let values: Vec<f32> = frames.iter().map(|f| f[component]).collect();
        let spline = CubicSpline::fit(&times, &values);
        for (j, frame) in result.iter_mut().enumerate() {
            frame[component] = spline.evaluate(j as f32 * target_step);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_rounds_to_nearest() {
        assert_eq!(target_frame_count(25, 24.0, 30.0), 31);
        assert_eq!(target_frame_count(40, 10.0, 25.0), 100);
        assert_eq!(target_frame_count(10, 25.0, 25.0), 10);
    }

    #[test]
    fn degenerate_targets_clamp_to_two_frames() {
        assert_eq!(target_frame_count(2, 25.0, 10.0), 2);
        assert_eq!(target_frame_count(1, 25.0, 10.0), 2);
    }
}
