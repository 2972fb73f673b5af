//! Parameter types configuring the offset search.
//!
//! The two strategies carry independent tolerance knobs. The intersection
//! strategy's orientation dot threshold and the composition strategy's
//! per-element matrix tolerance are not derived from a shared precision
//! model, so they are kept as separate settings.

use super::error::SearchError;
use crate::generate::MembershipMode;
use serde::{Deserialize, Serialize};

/// Which candidate generator/validator pair to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Orientation-filtered translation intersection, validated by
    /// position + orientation. Finds translation-only offsets.
    #[default]
    Intersection,
    /// Base-pose transform composition validated element-wise. Finds full
    /// rigid offsets.
    Composition,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Intersection => write!(f, "intersection"),
            StrategyKind::Composition => write!(f, "composition"),
        }
    }
}

/// Candidate generation by orientation-filtered offset intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionParams {
    /// Forward and up basis vectors must both have a dot product above this
    /// value (0.99 ≈ 8°).
    pub orientation_dot_min: f32,
    /// Distance under which two candidate offsets are the same candidate.
    pub offset_tolerance: f32,
    /// Membership rule for candidate deduplication and intersection.
    pub membership: MembershipMode,
}

impl Default for IntersectionParams {
    fn default() -> Self {
        Self {
            orientation_dot_min: 0.99,
            offset_tolerance: 0.1,
            membership: MembershipMode::Radius,
        }
    }
}

/// Validation of translation candidates against the full pose sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    /// Translated model position must be strictly closer than this to a
    /// space position.
    pub position_tolerance: f32,
    /// Maximum rotation (degrees) between a model pose and its matched
    /// space pose.
    pub angle_tolerance_deg: f32,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            position_tolerance: 0.001,
            angle_tolerance_deg: 5.0,
        }
    }
}

/// Transform-composition candidates and their element-wise check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionParams {
    /// Each of the 16 matrix components must differ by less than this.
    pub element_tolerance: f32,
}

impl Default for CompositionParams {
    fn default() -> Self {
        Self {
            element_tolerance: 0.001,
        }
    }
}

/// Search-wide parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub strategy: StrategyKind,
    pub intersection: IntersectionParams,
    pub validation: ValidationParams,
    pub composition: CompositionParams,
}

impl SearchParams {
    pub fn with_strategy(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Reject non-positive or non-finite tolerances and an orientation
    /// threshold that no unit vectors could exceed.
    pub fn validate(&self) -> Result<(), SearchError> {
        positive("intersection.offset_tolerance", self.intersection.offset_tolerance)?;
        positive("validation.position_tolerance", self.validation.position_tolerance)?;
        positive("validation.angle_tolerance_deg", self.validation.angle_tolerance_deg)?;
        positive("composition.element_tolerance", self.composition.element_tolerance)?;
        let dot = self.intersection.orientation_dot_min;
        if !dot.is_finite() || !(-1.0..1.0).contains(&dot) {
            return Err(SearchError::InvalidParameter {
                name: "intersection.orientation_dot_min",
                value: dot,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), SearchError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SearchParams::default();
        assert_eq!(params.strategy, StrategyKind::Intersection);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let mut params = SearchParams::default();
        params.validation.position_tolerance = 0.0;
        assert_eq!(
            params.validate(),
            Err(SearchError::InvalidParameter {
                name: "validation.position_tolerance",
                value: 0.0
            })
        );
    }

    #[test]
    fn dot_threshold_of_one_is_rejected() {
        let mut params = SearchParams::default();
        params.intersection.orientation_dot_min = 1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let params: SearchParams =
            serde_json::from_str(r#"{ "strategy": "composition", "validation": { "angle_tolerance_deg": 2.5 } }"#)
                .unwrap();
        assert_eq!(params.strategy, StrategyKind::Composition);
        assert_eq!(params.validation.angle_tolerance_deg, 2.5);
        assert_eq!(params.validation.position_tolerance, 0.001);
        assert_eq!(params.intersection, IntersectionParams::default());
    }
}
