//! Angle utilities used when comparing pose orientations.

use nalgebra::{UnitQuaternion, Vector3};

/// Unsigned angle between two orientations in degrees, in `[0, 180]`.
///
/// Antipodal quaternions describe the same rotation and yield zero. A NaN
/// quaternion (degenerate basis) yields NaN.
#[inline]
pub fn rotation_angle_deg(a: &UnitQuaternion<f32>, b: &UnitQuaternion<f32>) -> f32 {
    let dot = a.coords.dot(&b.coords).abs().clamp(0.0, 1.0);
    (2.0 * dot.acos()).to_degrees()
}

/// Whether two basis directions are aligned above a raw dot-product
/// threshold. The vectors are not normalised; rigid bases are unit length.
#[inline]
pub fn directions_aligned(a: &Vector3<f32>, b: &Vector3<f32>, dot_min: f32) -> bool {
    a.dot(b) > dot_min
}

/// Opening angle (degrees) that corresponds to a unit-vector dot threshold.
#[inline]
pub fn dot_threshold_to_deg(dot_min: f32) -> f32 {
    dot_min.clamp(-1.0, 1.0).acos().to_degrees()
}
