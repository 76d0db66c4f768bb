//! Coordinate convention between the source engine and the target rig.
//!
//! Source and target differ by one known, constant basis change plus a
//! uniform unit scale. Both are bundled in a single value consumed by the
//! pose reconstructor, instead of being scattered as inline swizzles, so the
//! convention can be swapped and tested in isolation.

use glam::{Quat, Vec3};

/// A fixed axis remap plus uniform unit scale.
///
/// `axis_source[i]` names the source component feeding target axis `i`, and
/// `axis_sign[i]` the sign applied to it. The same swizzle serves positions
/// and quaternion vector parts; `w` is never touched. These constants are
/// part of the conversion contract, validated against reference output; do
/// not re-derive them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConvention {
    pub axis_source: [usize; 3],
    pub axis_sign: [f32; 3],
    /// Uniform scale applied to every translation (source centimeters to
    /// target units).
    pub unit_scale: f32,
}

impl CoordinateConvention {
    /// The target rig's convention: `(x, y, z) -> (-z, x, y)`, centimeters
    /// to meters.
    pub const TARGET_RIG: Self = Self {
        axis_source: [2, 0, 1],
        axis_sign: [-1.0, 1.0, 1.0],
        unit_scale: 0.01,
    };

    /// No-op convention, useful for isolating the transform math in tests.
    pub const IDENTITY: Self = Self {
        axis_source: [0, 1, 2],
        axis_sign: [1.0, 1.0, 1.0],
        unit_scale: 1.0,
    };

    /// Remaps a position into the target basis.
    #[inline]
    #[must_use]
    pub fn remap_position(&self, v: Vec3) -> Vec3 {
        let s = v.to_array();
        Vec3::new(
            self.axis_sign[0] * s[self.axis_source[0]],
            self.axis_sign[1] * s[self.axis_source[1]],
            self.axis_sign[2] * s[self.axis_source[2]],
        )
    }

    /// Remaps a rotation into the target basis: the position swizzle applied
    /// to the vector part, `w` unchanged.
    #[inline]
    #[must_use]
    pub fn remap_rotation(&self, q: Quat) -> Quat {
        let v = self.remap_position(Vec3::new(q.x, q.y, q.z));
        Quat::from_xyzw(v.x, v.y, v.z, q.w)
    }

    /// Brings a source translation into target units.
    #[inline]
    #[must_use]
    pub fn scale_translation(&self, v: Vec3) -> Vec3 {
        v * self.unit_scale
    }
}
