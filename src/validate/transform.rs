//! Element-wise matching of mapped model poses against the space set.

use super::Rejection;
use crate::spatial::SpatialIndex;
use crate::types::{PoseList, RigidTransform};

/// Finds space poses whose 16 matrix components all lie strictly within
/// `tolerance` of a query pose.
///
/// Translation components are the last matrix column, so any match lies
/// within `sqrt(3) * tolerance` of the query position. The R-tree narrows the
/// search to those neighbours before the full component check.
pub struct TransformMatcher<'a> {
    space: &'a PoseList,
    index: SpatialIndex,
    tolerance: f32,
}

impl<'a> TransformMatcher<'a> {
    pub fn new(space: &'a PoseList, tolerance: f32) -> Self {
        Self {
            space,
            index: SpatialIndex::new(&space.positions()),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Lowest-index space pose matching `pose` component-wise.
    pub fn find_match(&self, pose: &RigidTransform) -> Option<usize> {
        let radius = self.tolerance * 3f32.sqrt();
        self.index
            .within(&pose.position(), radius)
            .into_iter()
            .map(|(idx, _)| idx)
            .find(|&idx| {
                self.space
                    .get(idx)
                    .is_some_and(|s| s.max_abs_difference(pose) < self.tolerance)
            })
    }

    /// Whether `candidate * m` matches some space pose for every model pose.
    pub fn validate(&self, candidate: &RigidTransform, model: &PoseList) -> Result<(), Rejection> {
        for (i, model_pose) in model.iter().enumerate() {
            if self.find_match(&candidate.compose(model_pose)).is_none() {
                return Err(Rejection::NoTransformMatch { model_index: i });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    #[test]
    fn matches_only_when_every_component_is_close() {
        let rot = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.5);
        let pose = RigidTransform::from_parts(Vector3::new(1.0, 2.0, 3.0), rot);
        let slightly_turned = RigidTransform::from_parts(
            Vector3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.51),
        );
        let space = PoseList::new(vec![slightly_turned, pose]);
        let matcher = TransformMatcher::new(&space, 0.001);
        assert_eq!(matcher.find_match(&pose), Some(1));
        assert_eq!(matcher.find_match(&pose.translated(&Vector3::new(0.0, 0.0, 0.01))), None);
    }

    #[test]
    fn validate_reports_first_failing_model_pose() {
        let space = PoseList::new(vec![RigidTransform::identity()]);
        let model = PoseList::new(vec![
            RigidTransform::identity(),
            RigidTransform::from_translation(Vector3::new(1.0, 0.0, 0.0)),
        ]);
        let matcher = TransformMatcher::new(&space, 0.001);
        assert_eq!(
            matcher.validate(&RigidTransform::identity(), &model),
            Err(Rejection::NoTransformMatch { model_index: 1 })
        );
    }
}
