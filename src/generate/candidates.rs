//! Offset candidate sets with a selectable membership rule.

use crate::spatial::RadiusSet;
use crate::tolerance::BucketSet;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// How two candidate offsets are judged to be the same member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipMode {
    /// Strict radius query over an R-tree. Exact up to the tolerance.
    #[default]
    Radius,
    /// Rounded-coordinate hash plus in-bucket distance check. Can miss
    /// equal values that straddle a rounding boundary.
    Bucketed,
}

/// Deduplicated, insertion-ordered set of translation offsets.
#[derive(Clone, Debug)]
pub enum CandidateSet {
    Radius(RadiusSet),
    Bucketed(BucketSet),
}

impl CandidateSet {
    pub fn new(mode: MembershipMode, tolerance: f32) -> Self {
        match mode {
            MembershipMode::Radius => CandidateSet::Radius(RadiusSet::new(tolerance)),
            MembershipMode::Bucketed => CandidateSet::Bucketed(BucketSet::new(tolerance)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CandidateSet::Radius(s) => s.len(),
            CandidateSet::Bucketed(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, p: &Vector3<f32>) -> bool {
        match self {
            CandidateSet::Radius(s) => s.contains(p),
            CandidateSet::Bucketed(s) => s.contains(p),
        }
    }

    pub fn insert(&mut self, p: Vector3<f32>) -> bool {
        match self {
            CandidateSet::Radius(s) => s.insert(p),
            CandidateSet::Bucketed(s) => s.insert(p),
        }
    }

    /// Keep the members of `self` that `other` contains. Both sets must use
    /// the same membership mode; a mismatched `other` is treated through
    /// its own `contains`, member by member.
    pub fn intersect_with(&mut self, other: &CandidateSet) {
        match (self, other) {
            (CandidateSet::Radius(a), CandidateSet::Radius(b)) => a.intersect_with(b),
            (CandidateSet::Bucketed(a), CandidateSet::Bucketed(b)) => a.intersect_with(b),
            (this, other) => {
                let mode = this.mode();
                let tolerance = this.tolerance();
                let kept: Vec<Vector3<f32>> = this
                    .to_vec()
                    .into_iter()
                    .filter(|p| other.contains(p))
                    .collect();
                let mut rebuilt = CandidateSet::new(mode, tolerance);
                for p in kept {
                    rebuilt.insert(p);
                }
                *this = rebuilt;
            }
        }
    }

    pub fn mode(&self) -> MembershipMode {
        match self {
            CandidateSet::Radius(_) => MembershipMode::Radius,
            CandidateSet::Bucketed(_) => MembershipMode::Bucketed,
        }
    }

    fn tolerance(&self) -> f32 {
        match self {
            CandidateSet::Radius(s) => s.tolerance(),
            CandidateSet::Bucketed(s) => s.tolerance(),
        }
    }

    pub fn to_vec(&self) -> Vec<Vector3<f32>> {
        match self {
            CandidateSet::Radius(s) => s.iter().copied().collect(),
            CandidateSet::Bucketed(s) => s.iter().copied().collect(),
        }
    }

    pub fn into_vec(self) -> Vec<Vector3<f32>> {
        match self {
            CandidateSet::Radius(s) => s.into_vec(),
            CandidateSet::Bucketed(s) => s.into_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_modes_deduplicate_close_offsets() {
        for mode in [MembershipMode::Radius, MembershipMode::Bucketed] {
            let mut set = CandidateSet::new(mode, 0.1);
            assert!(set.insert(Vector3::new(2.0, 2.0, 2.0)));
            assert!(!set.insert(Vector3::new(2.0001, 2.0, 2.0)));
            assert!(set.insert(Vector3::new(7.0, 2.0, 2.0)));
            assert_eq!(set.len(), 2, "mode {mode:?}");
        }
    }

    #[test]
    fn mixed_mode_intersection_falls_back_to_membership_checks() {
        let mut a = CandidateSet::new(MembershipMode::Radius, 0.1);
        a.insert(Vector3::new(1.0, 0.0, 0.0));
        a.insert(Vector3::new(2.0, 0.0, 0.0));
        let mut b = CandidateSet::new(MembershipMode::Bucketed, 0.1);
        b.insert(Vector3::new(2.0, 0.0, 0.0));
        a.intersect_with(&b);
        assert_eq!(a.mode(), MembershipMode::Radius);
        assert_eq!(a.into_vec(), vec![Vector3::new(2.0, 0.0, 0.0)]);
    }
}
