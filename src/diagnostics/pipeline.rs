use super::{GenerationStage, TimingBreakdown, ValidationStage};
use crate::search::StrategyKind;
use crate::types::ValidatedOffset;
use serde::Serialize;

/// Sizes of the two pose sets a search ran on.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub model_poses: usize,
    pub space_poses: usize,
}

/// Phases of a search, visited strictly in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Generate,
    Filter,
    Validate,
    Emit,
}

impl SearchPhase {
    pub const ORDER: [SearchPhase; 4] = [
        SearchPhase::Generate,
        SearchPhase::Filter,
        SearchPhase::Validate,
        SearchPhase::Emit,
    ];

    /// All phases up to and including `self`.
    pub fn through(self) -> Vec<SearchPhase> {
        Self::ORDER.iter().copied().filter(|p| *p <= self).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    EmptyModel,
    EmptySpace,
    /// No candidate survived generation/filtering.
    NoCandidates,
    /// Candidates existed but none passed validation.
    NoneValidated,
}

/// Terminal state of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchOutcome {
    EmptyResult { reason: EmptyReason },
    Completed { offsets: usize },
}

/// Everything the search observed while running.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTrace {
    pub input: InputDescriptor,
    pub strategy: StrategyKind,
    pub cooperative: bool,
    pub phases: Vec<SearchPhase>,
    pub generation: GenerationStage,
    pub validation: ValidationStage,
    pub outcome: SearchOutcome,
    pub timing: TimingBreakdown,
}

/// Validated offsets plus the trace that produced them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub offsets: Vec<ValidatedOffset>,
    pub trace: SearchTrace,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
