use serde::Serialize;

/// Why a single candidate failed validation. Local to the candidate, never
/// surfaced as an error.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// No space position strictly within the distance tolerance of the
    /// offset model position.
    NoPositionMatch {
        model_index: usize,
        nearest_distance: Option<f32>,
    },
    /// Position matched, orientation differs by more than the tolerance.
    OrientationMismatch {
        model_index: usize,
        space_index: usize,
        angle_deg: f32,
    },
    /// No space pose matches all 16 components of the mapped model pose.
    NoTransformMatch { model_index: usize },
}

impl Rejection {
    pub fn model_index(&self) -> usize {
        match self {
            Rejection::NoPositionMatch { model_index, .. }
            | Rejection::OrientationMismatch { model_index, .. }
            | Rejection::NoTransformMatch { model_index } => *model_index,
        }
    }
}

/// Validation outcome counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStage {
    pub tested: usize,
    pub accepted: usize,
    pub rejected_position: usize,
    pub rejected_orientation: usize,
    pub rejected_transform: usize,
    /// Accepted candidates dropped as duplicates of an earlier result.
    pub duplicates: usize,
}

impl ValidationStage {
    pub fn record(&mut self, outcome: Result<(), Rejection>) {
        self.tested += 1;
        match outcome {
            Ok(()) => self.accepted += 1,
            Err(Rejection::NoPositionMatch { .. }) => self.rejected_position += 1,
            Err(Rejection::OrientationMismatch { .. }) => self.rejected_orientation += 1,
            Err(Rejection::NoTransformMatch { .. }) => self.rejected_transform += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_position + self.rejected_orientation + self.rejected_transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_outcome() {
        let mut stage = ValidationStage::default();
        stage.record(Ok(()));
        stage.record(Err(Rejection::NoTransformMatch { model_index: 1 }));
        stage.record(Err(Rejection::NoPositionMatch {
            model_index: 0,
            nearest_distance: None,
        }));
        assert_eq!(stage.tested, 3);
        assert_eq!(stage.accepted, 1);
        assert_eq!(stage.rejected(), 2);
    }
}
