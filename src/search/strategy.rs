//! The strategy seam: one interface over both generator/validator pairs.

use super::context::SearchContext;
use super::error::SearchError;
use super::params::{CompositionParams, IntersectionParams, SearchParams, StrategyKind, ValidationParams};
use crate::diagnostics::{GenerationStage, SearchPhase, ValidationStage};
use crate::generate::{CompositionSearch, IntersectionGenerator};
use crate::types::{Offset, PoseList, ValidatedOffset};
use crate::validate::TranslationValidator;
use log::debug;
use std::time::Instant;

/// What a strategy hands back to the orchestrator.
#[derive(Clone, Debug, Default)]
pub struct StrategyRun {
    pub offsets: Vec<ValidatedOffset>,
    pub generation: GenerationStage,
    pub validation: ValidationStage,
    /// Last phase the strategy entered before returning.
    pub last_phase: Option<SearchPhase>,
    pub generate_ms: f64,
    pub validate_ms: f64,
}

/// A candidate generator paired with its validator.
pub trait OffsetStrategy {
    fn kind(&self) -> StrategyKind;

    /// Find every offset mapping all of `model` into `space`.
    ///
    /// `model` and `space` are non-empty when called by the orchestrator.
    fn find_offsets(
        &self,
        model: &PoseList,
        space: &PoseList,
        ctx: &mut SearchContext<'_>,
    ) -> Result<StrategyRun, SearchError>;
}

/// Build the strategy selected by `params.strategy`.
pub fn strategy_for(params: &SearchParams) -> Box<dyn OffsetStrategy> {
    match params.strategy {
        StrategyKind::Intersection => Box::new(IntersectionStrategy::new(
            params.intersection.clone(),
            params.validation.clone(),
        )),
        StrategyKind::Composition => {
            Box::new(CompositionStrategy::new(params.composition.clone()))
        }
    }
}

/// Fast path: translation candidates by intersection, then position +
/// orientation validation of each survivor.
#[derive(Clone, Debug, Default)]
pub struct IntersectionStrategy {
    generator: IntersectionGenerator,
    validation: ValidationParams,
}

impl IntersectionStrategy {
    pub fn new(intersection: IntersectionParams, validation: ValidationParams) -> Self {
        Self {
            generator: IntersectionGenerator::new(intersection),
            validation,
        }
    }
}

impl OffsetStrategy for IntersectionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Intersection
    }

    fn find_offsets(
        &self,
        model: &PoseList,
        space: &PoseList,
        ctx: &mut SearchContext<'_>,
    ) -> Result<StrategyRun, SearchError> {
        let gen_start = Instant::now();
        let generated = self.generator.generate(model, space);
        let generate_ms = gen_start.elapsed().as_secs_f64() * 1000.0;
        ctx.checkpoint()?;

        let mut run = StrategyRun {
            generation: generated.stage,
            generate_ms,
            last_phase: Some(SearchPhase::Filter),
            ..Default::default()
        };
        if generated.candidates.is_empty() {
            return Ok(run);
        }

        debug!(
            "IntersectionStrategy: validating {} candidates",
            generated.candidates.len()
        );
        run.last_phase = Some(SearchPhase::Validate);
        let val_start = Instant::now();
        let validator = TranslationValidator::new(model, space, self.validation.clone());
        for candidate in &generated.candidates {
            ctx.checkpoint()?;
            let outcome = validator.validate(candidate);
            run.validation.record(outcome);
            match outcome {
                Ok(()) => run.offsets.push(ValidatedOffset {
                    offset: Offset::Translation(*candidate),
                    strategy: StrategyKind::Intersection,
                    anchor_space_index: None,
                }),
                Err(rejection) => debug!(
                    "IntersectionStrategy: candidate ({:.3}, {:.3}, {:.3}) rejected: {:?}",
                    candidate.x, candidate.y, candidate.z, rejection
                ),
            }
        }
        run.validate_ms = val_start.elapsed().as_secs_f64() * 1000.0;
        Ok(run)
    }
}

/// Exact path: full rigid candidates from the base pose, validated inline
/// element-wise. Supports the cooperative visualization mode.
#[derive(Clone, Debug, Default)]
pub struct CompositionStrategy {
    search: CompositionSearch,
}

impl CompositionStrategy {
    pub fn new(params: CompositionParams) -> Self {
        Self {
            search: CompositionSearch::new(params),
        }
    }
}

impl OffsetStrategy for CompositionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Composition
    }

    fn find_offsets(
        &self,
        model: &PoseList,
        space: &PoseList,
        ctx: &mut SearchContext<'_>,
    ) -> Result<StrategyRun, SearchError> {
        let start = Instant::now();
        let out = self.search.run(model, space, ctx)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        // Generation and validation are interleaved; the time is reported
        // under validation.
        Ok(StrategyRun {
            offsets: out.offsets,
            last_phase: Some(SearchPhase::Validate),
            generation: out.generation,
            validation: out.validation,
            generate_ms: 0.0,
            validate_ms: elapsed_ms,
        })
    }
}
