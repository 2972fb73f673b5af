//! Position + orientation validation of translation offsets.
//!
//! Each model pose is shifted by the candidate and matched against the
//! nearest space position. Matching is exact nearest-neighbour, never the
//! rounded bucket hash, so the tight distance tolerance is applied to true
//! distances. Matching is many-to-one: two model poses may land on the same
//! space pose and both pass.

use super::Rejection;
use crate::angle::rotation_angle_deg;
use crate::search::ValidationParams;
use crate::spatial::SpatialIndex;
use crate::types::PoseList;
use log::debug;
use nalgebra::{UnitQuaternion, Vector3};

/// Validator bound to one model/space pair. Builds the space index and the
/// space orientations once and reuses them for every candidate.
pub struct TranslationValidator<'a> {
    params: ValidationParams,
    model: &'a PoseList,
    model_orientations: Vec<UnitQuaternion<f32>>,
    space_orientations: Vec<UnitQuaternion<f32>>,
    index: SpatialIndex,
}

impl<'a> TranslationValidator<'a> {
    pub fn new(model: &'a PoseList, space: &PoseList, params: ValidationParams) -> Self {
        Self {
            params,
            model,
            model_orientations: model.iter().map(|p| p.orientation()).collect(),
            space_orientations: space.iter().map(|p| p.orientation()).collect(),
            index: SpatialIndex::new(&space.positions()),
        }
    }

    /// Accept `offset` iff every model pose, shifted by it, lies strictly
    /// within the position tolerance of its nearest space pose and its
    /// orientation is no more than the angular tolerance away from that
    /// pose's orientation. Stops at the first failing model pose.
    pub fn validate(&self, offset: &Vector3<f32>) -> Result<(), Rejection> {
        for (i, model_pose) in self.model.iter().enumerate() {
            let target = model_pose.position() + offset;
            let nearest = self.index.nearest(&target);
            let (space_index, distance) = match nearest {
                Some((idx, d)) if d < self.params.position_tolerance => (idx, d),
                _ => {
                    debug!(
                        "TranslationValidator: model pose {} has no space position within {}",
                        i, self.params.position_tolerance
                    );
                    return Err(Rejection::NoPositionMatch {
                        model_index: i,
                        nearest_distance: nearest.map(|(_, d)| d),
                    });
                }
            };

            let angle_deg = rotation_angle_deg(
                &self.model_orientations[i],
                &self.space_orientations[space_index],
            );
            // NaN (no recoverable orientation) never matches.
            if angle_deg.is_nan() || angle_deg > self.params.angle_tolerance_deg {
                debug!(
                    "TranslationValidator: model pose {} matched space pose {} at {:.5} but angle {:.3}°",
                    i, space_index, distance, angle_deg
                );
                return Err(Rejection::OrientationMismatch {
                    model_index: i,
                    space_index,
                    angle_deg,
                });
            }
        }
        Ok(())
    }
}

/// One-shot validation of a translation offset.
pub fn validate_translation(
    offset: &Vector3<f32>,
    model: &PoseList,
    space: &PoseList,
    params: &ValidationParams,
) -> bool {
    TranslationValidator::new(model, space, params.clone())
        .validate(offset)
        .is_ok()
}
