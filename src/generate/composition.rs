//! Base-pose transform composition.
//!
//! Every space pose `s` is a possible image of the model base pose `m0`, so
//! `s * m0⁻¹` is a candidate rigid offset. A candidate is checked right away
//! by mapping every model pose through it and looking for an element-wise
//! match in space; the first model pose without a match rejects it.

use crate::diagnostics::{GenerationStage, ValidationStage};
use crate::search::{CompositionParams, SearchContext, SearchError, StrategyKind};
use crate::types::{Offset, PoseList, RigidTransform, ValidatedOffset};
use crate::validate::{Rejection, TransformMatcher};
use log::debug;

/// Validated offsets plus generation/validation counters.
#[derive(Clone, Debug)]
pub struct CompositionOutput {
    pub offsets: Vec<ValidatedOffset>,
    pub generation: GenerationStage,
    pub validation: ValidationStage,
}

#[derive(Clone, Debug, Default)]
pub struct CompositionSearch {
    params: CompositionParams,
}

impl CompositionSearch {
    pub fn new(params: CompositionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CompositionParams {
        &self.params
    }

    /// Candidate offsets `s_j * m0⁻¹`, one per space pose, in space order.
    ///
    /// Fails when the base pose cannot be inverted; an empty model yields no
    /// candidates.
    pub fn candidates(
        &self,
        model: &PoseList,
        space: &PoseList,
    ) -> Result<Vec<RigidTransform>, SearchError> {
        let Some(base) = model.first() else {
            return Ok(Vec::new());
        };
        let inv_base = base.try_inverse()?;
        Ok(space.iter().map(|s| s.compose(&inv_base)).collect())
    }

    /// Generate and validate candidates, yielding to `ctx` before every
    /// model pose test.
    pub fn run(
        &self,
        model: &PoseList,
        space: &PoseList,
        ctx: &mut SearchContext<'_>,
    ) -> Result<CompositionOutput, SearchError> {
        let candidates = self.candidates(model, space)?;
        let matcher = TransformMatcher::new(space, self.params.element_tolerance);
        let mut generation = GenerationStage {
            candidates: candidates.len(),
            ..Default::default()
        };
        let mut validation = ValidationStage::default();
        let mut offsets: Vec<ValidatedOffset> = Vec::new();

        for (j, candidate) in candidates.iter().enumerate() {
            ctx.checkpoint()?;
            let (outcome, tested) = self.check_candidate(candidate, model, &matcher, ctx)?;
            generation.model_poses_scanned += tested;
            validation.record(outcome);
            if outcome.is_err() {
                continue;
            }

            let duplicate = offsets
                .iter()
                .any(|o| o.transform().max_abs_difference(candidate) < self.params.element_tolerance);
            if duplicate {
                validation.duplicates += 1;
                continue;
            }
            debug!("CompositionSearch: candidate from space pose {} validated", j);
            offsets.push(ValidatedOffset {
                offset: Offset::Transform(*candidate),
                strategy: StrategyKind::Composition,
                anchor_space_index: Some(j),
            });
        }

        Ok(CompositionOutput {
            offsets,
            generation,
            validation,
        })
    }

    /// Test one candidate against every model pose, short-circuiting on the
    /// first miss. Returns the outcome and how many model poses were tested.
    fn check_candidate(
        &self,
        candidate: &RigidTransform,
        model: &PoseList,
        matcher: &TransformMatcher<'_>,
        ctx: &mut SearchContext<'_>,
    ) -> Result<(Result<(), Rejection>, usize), SearchError> {
        for (k, model_pose) in model.iter().enumerate() {
            let applied = candidate.compose(model_pose);
            let matched = matcher.find_match(&applied).is_some();
            ctx.present(k, &applied, matched)?;
            if !matched {
                return Ok((Err(Rejection::NoTransformMatch { model_index: k }), k + 1));
            }
        }
        Ok((Ok(()), model.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::CancelToken;
    use crate::visualize::Placement;
    use nalgebra::{Matrix4, UnitQuaternion, Vector3};
    use std::time::Duration;

    fn pose(x: f32, y: f32, z: f32, yaw_deg: f32) -> RigidTransform {
        RigidTransform::from_parts(
            Vector3::new(x, y, z),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_deg.to_radians()),
        )
    }

    #[test]
    fn singular_base_pose_is_an_error() {
        let model = PoseList::new(vec![RigidTransform::from_matrix(Matrix4::zeros())]);
        let space = PoseList::new(vec![RigidTransform::identity()]);
        let search = CompositionSearch::default();
        let mut ctx = SearchContext::default();
        assert!(matches!(
            search.run(&model, &space, &mut ctx),
            Err(SearchError::SingularTransform(_))
        ));
    }

    #[test]
    fn recovers_rotated_offset() {
        let offset = pose(3.0, -1.0, 2.0, 30.0);
        let model = PoseList::new(vec![pose(0.0, 0.0, 0.0, 0.0), pose(2.0, 0.0, 1.0, 90.0)]);
        let mut mapped: Vec<RigidTransform> = model.iter().map(|m| offset.compose(m)).collect();
        mapped.push(pose(9.0, 9.0, 9.0, 0.0));
        let space = PoseList::new(mapped);

        let out = CompositionSearch::default()
            .run(&model, &space, &mut SearchContext::default())
            .unwrap();
        assert_eq!(out.offsets.len(), 1);
        assert!(out.offsets[0].transform().max_abs_difference(&offset) < 1e-4);
        assert_eq!(out.offsets[0].anchor_space_index, Some(0));
        assert_eq!(out.validation.tested, 3);
    }

    #[test]
    fn cooperative_mode_presents_each_tested_pose_in_order() {
        let model = PoseList::new(vec![pose(0.0, 0.0, 0.0, 0.0), pose(1.0, 0.0, 0.0, 0.0)]);
        let space = PoseList::new(vec![pose(5.0, 0.0, 0.0, 0.0), pose(6.0, 0.0, 0.0, 0.0)]);
        let mut placements: Vec<Placement> = Vec::new();
        let out = {
            let mut ctx = SearchContext::new(CancelToken::new())
                .with_visualization(&mut placements, Duration::from_millis(1));
            CompositionSearch::default().run(&model, &space, &mut ctx).unwrap()
        };
        assert_eq!(out.offsets.len(), 1);
        // Candidate from space pose 0 tests both model poses; candidate from
        // space pose 1 fails on the second.
        let slots: Vec<(usize, bool)> = placements.iter().map(|p| (p.slot, p.active)).collect();
        assert_eq!(slots, vec![(0, true), (1, true), (0, true), (1, false)]);
    }

    #[test]
    fn cancelled_search_stops() {
        let model = PoseList::new(vec![pose(0.0, 0.0, 0.0, 0.0)]);
        let space = PoseList::new(vec![pose(5.0, 0.0, 0.0, 0.0)]);
        let token = CancelToken::new();
        token.cancel();
        let mut ctx = SearchContext::new(token);
        assert_eq!(
            CompositionSearch::default().run(&model, &space, &mut ctx).unwrap_err(),
            SearchError::Cancelled
        );
    }
}
