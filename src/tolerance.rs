//! Tolerance-based equality for positions and orientations.
//!
//! Approximate equality is reflexive and symmetric but not transitive: with a
//! tolerance of 0.1, `a ≈ b` and `b ≈ c` can hold while `a ≉ c`. Every check
//! in the validators is pairwise, never bucketed through a shared
//! representative.
//!
//! [`BucketSet`] reproduces the rounded-hash set used by the fast offset
//! intersection path. It only compares values whose rounded coordinates hash
//! to the same key, so two positions that are within tolerance but fall on
//! either side of a 1/1000 rounding boundary compare unequal. That false
//! negative is accepted for the bucketed mode; the default membership mode
//! uses a radius query instead (see [`crate::spatial`]).

use crate::angle::rotation_angle_deg;
use nalgebra::{UnitQuaternion, Vector3};
use std::collections::HashMap;

/// Rounding resolution of [`bucket_key`] (buckets per unit).
pub const BUCKET_RESOLUTION: f32 = 1000.0;

/// True iff the Euclidean distance is strictly below `tol`.
#[inline]
pub fn positions_equal(a: &Vector3<f32>, b: &Vector3<f32>, tol: f32) -> bool {
    (a - b).norm() < tol
}

/// True iff the rotation between `a` and `b` is strictly below `angle_tol_deg`.
#[inline]
pub fn orientations_equal(
    a: &UnitQuaternion<f32>,
    b: &UnitQuaternion<f32>,
    angle_tol_deg: f32,
) -> bool {
    rotation_angle_deg(a, b) < angle_tol_deg
}

/// Hash key of a position rounded to [`BUCKET_RESOLUTION`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketKey(pub i32);

/// Round each coordinate to the nearest 1/1000 (halves to even) and fold the three integers
/// with shifted XOR: `x ^ (y << 10) ^ (z << 20)`.
#[inline]
pub fn bucket_key(p: &Vector3<f32>) -> BucketKey {
    let x = (p.x * BUCKET_RESOLUTION).round_ties_even() as i32;
    let y = (p.y * BUCKET_RESOLUTION).round_ties_even() as i32;
    let z = (p.z * BUCKET_RESOLUTION).round_ties_even() as i32;
    BucketKey(x ^ y.wrapping_shl(10) ^ z.wrapping_shl(20))
}

/// Insertion-ordered set of positions deduplicated by bucket key plus a
/// distance check inside the bucket.
#[derive(Clone, Debug)]
pub struct BucketSet {
    tolerance: f32,
    buckets: HashMap<BucketKey, Vec<usize>>,
    items: Vec<Vector3<f32>>,
}

impl BucketSet {
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance,
            buckets: HashMap::new(),
            items: Vec::new(),
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, p: &Vector3<f32>) -> bool {
        self.buckets.get(&bucket_key(p)).is_some_and(|slots| {
            slots
                .iter()
                .any(|&i| positions_equal(&self.items[i], p, self.tolerance))
        })
    }

    /// Insert unless an equal position is already stored. Returns whether
    /// the value was added.
    pub fn insert(&mut self, p: Vector3<f32>) -> bool {
        if self.contains(&p) {
            return false;
        }
        let idx = self.items.len();
        self.items.push(p);
        self.buckets.entry(bucket_key(&p)).or_default().push(idx);
        true
    }

    /// Keep only the members that `other` also contains.
    pub fn intersect_with(&mut self, other: &BucketSet) {
        let kept: Vec<Vector3<f32>> = self
            .items
            .iter()
            .filter(|p| other.contains(p))
            .copied()
            .collect();
        let mut rebuilt = BucketSet::new(self.tolerance);
        for p in kept {
            rebuilt.insert(p);
        }
        *self = rebuilt;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector3<f32>> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Vector3<f32>> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_equal_to_tolerance_is_not_equal() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.5, 0.0, 0.0);
        assert!(!positions_equal(&a, &b, 0.5));
        assert!(positions_equal(&a, &b, 0.5001));
    }

    #[test]
    fn equality_is_symmetric_but_not_transitive() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(0.06, 0.0, 0.0);
        let c = Vector3::new(0.12, 0.0, 0.0);
        let tol = 0.1;
        assert!(positions_equal(&a, &b, tol) && positions_equal(&b, &a, tol));
        assert!(positions_equal(&b, &c, tol));
        assert!(!positions_equal(&a, &c, tol));
    }

    #[test]
    fn orientation_tolerance_is_strict() {
        let id = UnitQuaternion::identity();
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 4.0f32.to_radians());
        assert!(orientations_equal(&id, &q, 5.0));
        assert!(!orientations_equal(&id, &q, 3.0));
        assert!(orientations_equal(&q, &id, 5.0));
    }

    #[test]
    fn nearby_values_share_a_bucket() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0002, 2.0001, 2.9999);
        assert_eq!(bucket_key(&a), bucket_key(&b));
    }

    #[test]
    fn bucket_key_rounds_halves_to_even() {
        assert_eq!(bucket_key(&Vector3::new(0.0125, 0.0, 0.0)), BucketKey(12));
        assert_eq!(bucket_key(&Vector3::new(0.0135, 0.0, 0.0)), BucketKey(14));
        assert_eq!(bucket_key(&Vector3::new(-0.0025, 0.0, 0.0)), BucketKey(-2));
    }

    #[test]
    fn bucket_set_misses_values_across_rounding_boundary() {
        // Both within 0.1 of each other, but rounded to different buckets.
        let a = Vector3::new(0.0004, 0.0, 0.0);
        let b = Vector3::new(0.0006, 0.0, 0.0);
        let mut set = BucketSet::new(0.1);
        assert!(set.insert(a));
        assert!(positions_equal(&a, &b, 0.1));
        assert!(!set.contains(&b));
        assert!(set.insert(b));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn bucket_set_intersection_keeps_shared_members_in_order() {
        let mut left = BucketSet::new(0.1);
        for p in [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(3.0, 0.0, 0.0),
        ] {
            left.insert(p);
        }
        let mut right = BucketSet::new(0.1);
        right.insert(Vector3::new(3.0, 0.0, 0.0));
        right.insert(Vector3::new(1.0, 0.0, 0.0));
        left.intersect_with(&right);
        let kept = left.into_vec();
        assert_eq!(kept, vec![Vector3::new(1.0, 0.0, 0.0), Vector3::new(3.0, 0.0, 0.0)]);
    }
}
