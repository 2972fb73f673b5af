//! Orientation-filtered offset intersection.
//!
//! For every model pose, each space pose with a matching orientation (forward
//! and up basis dot products above the threshold) proposes the translation
//! `space.position - model.position`. An offset that maps the whole model
//! must be proposed by every model pose, so the running candidate set is the
//! intersection of the per-pose sets. Intersection never grows the set,
//! which makes an empty running set a safe point to stop.

use super::candidates::CandidateSet;
use crate::angle::{directions_aligned, dot_threshold_to_deg};
use crate::diagnostics::GenerationStage;
use crate::search::IntersectionParams;
use crate::types::{PoseList, RigidTransform};
use log::debug;
use nalgebra::Vector3;

/// Translation candidates plus the counters gathered while producing them.
#[derive(Clone, Debug)]
pub struct IntersectionOutput {
    pub candidates: Vec<Vector3<f32>>,
    pub stage: GenerationStage,
}

/// Generator of unvalidated translation offsets.
#[derive(Clone, Debug, Default)]
pub struct IntersectionGenerator {
    params: IntersectionParams,
}

impl IntersectionGenerator {
    pub fn new(params: IntersectionParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &IntersectionParams {
        &self.params
    }

    /// Offsets proposed by `model_pose` against every orientation-compatible
    /// space pose, deduplicated under the configured membership rule.
    pub fn candidates_for(&self, model_pose: &RigidTransform, space: &PoseList) -> CandidateSet {
        let mut set = CandidateSet::new(self.params.membership, self.params.offset_tolerance);
        let forward = model_pose.forward();
        let up = model_pose.up();
        let position = model_pose.position();
        for space_pose in space {
            if directions_aligned(&forward, &space_pose.forward(), self.params.orientation_dot_min)
                && directions_aligned(&up, &space_pose.up(), self.params.orientation_dot_min)
            {
                set.insert(space_pose.position() - position);
            }
        }
        set
    }

    /// Intersect per-model-pose candidate sets, stopping as soon as the
    /// running intersection is empty.
    pub fn generate(&self, model: &PoseList, space: &PoseList) -> IntersectionOutput {
        let mut stage = GenerationStage::default();
        let mut running: Option<CandidateSet> = None;
        debug!(
            "IntersectionGenerator: {} model poses, {} space poses, orientation window {:.1}°",
            model.len(),
            space.len(),
            dot_threshold_to_deg(self.params.orientation_dot_min)
        );

        for (i, model_pose) in model.iter().enumerate() {
            let current = self.candidates_for(model_pose, space);
            stage.model_poses_scanned += 1;
            stage.candidates_per_model_pose.push(current.len());
            debug!(
                "IntersectionGenerator: model pose {} proposes {} offsets",
                i,
                current.len()
            );

            let surviving = match running.as_mut() {
                None => {
                    let n = current.len();
                    running = Some(current);
                    n
                }
                Some(set) => {
                    let before = set.len();
                    set.intersect_with(&current);
                    debug!(
                        "IntersectionGenerator: intersection {} -> {} after model pose {}",
                        before,
                        set.len(),
                        i
                    );
                    set.len()
                }
            };
            stage.surviving_after_model_pose.push(surviving);

            if surviving == 0 {
                debug!(
                    "IntersectionGenerator: no candidates remain after model pose {}, stopping",
                    i
                );
                stage.early_exit = i + 1 < model.len();
                return IntersectionOutput {
                    candidates: Vec::new(),
                    stage,
                };
            }
        }

        let candidates = running.map(CandidateSet::into_vec).unwrap_or_default();
        stage.candidates = candidates.len();
        IntersectionOutput { candidates, stage }
    }
}
