//! Search orchestration.
//!
//! [`OffsetSearch`] runs the configured strategy through the phases
//! `Generate → Filter → Validate → Emit`, never revisiting one, and always
//! ends in one of two terminal states: an empty result (with a reason) or a
//! completed result list.
//!
//! ```no_run
//! use pose_offsets::{OffsetSearch, PoseList, SearchParams};
//!
//! # fn example(model: PoseList, space: PoseList) {
//! let search = OffsetSearch::new(SearchParams::default());
//! match search.search(&model, &space) {
//!     Ok(offsets) => println!("found {} offsets", offsets.len()),
//!     Err(err) => eprintln!("search failed: {err}"),
//! }
//! # }
//! ```
use super::context::SearchContext;
use super::error::SearchError;
use super::params::{SearchParams, StrategyKind};
use super::strategy::strategy_for;
use crate::diagnostics::{
    EmptyReason, GenerationStage, InputDescriptor, SearchOutcome, SearchPhase, SearchReport,
    SearchTrace, TimingBreakdown, ValidationStage,
};
use crate::types::{PoseList, ValidatedOffset};
use log::{debug, info, warn};
use std::time::Instant;

/// Parametrised offset search over a model/space pair.
#[derive(Clone, Debug, Default)]
pub struct OffsetSearch {
    params: SearchParams,
}

impl OffsetSearch {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Run the search and return only the validated offsets.
    pub fn search(
        &self,
        model: &PoseList,
        space: &PoseList,
    ) -> Result<Vec<ValidatedOffset>, SearchError> {
        let mut ctx = SearchContext::default();
        self.search_with_context(model, space, &mut ctx)
            .map(|report| report.offsets)
    }

    /// Run the search and return the offsets together with the full trace.
    pub fn search_with_report(
        &self,
        model: &PoseList,
        space: &PoseList,
    ) -> Result<SearchReport, SearchError> {
        let mut ctx = SearchContext::default();
        self.search_with_context(model, space, &mut ctx)
    }

    /// Run the search under a caller-supplied context (cancellation token,
    /// optional cooperative visualization).
    pub fn search_with_context(
        &self,
        model: &PoseList,
        space: &PoseList,
        ctx: &mut SearchContext<'_>,
    ) -> Result<SearchReport, SearchError> {
        self.params.validate()?;
        model.check_finite()?;
        space.check_finite()?;
        warn_non_unit_bases("model", model);
        warn_non_unit_bases("space", space);
        if self.params.strategy == StrategyKind::Composition {
            // The base pose must be invertible even when there is nothing
            // to match it against.
            if let Some(base) = model.first() {
                base.try_inverse()?;
            }
        }
        let total_start = Instant::now();
        let input = InputDescriptor {
            model_poses: model.len(),
            space_poses: space.len(),
        };
        debug!(
            "OffsetSearch::search start strategy={} model={} space={} cooperative={}",
            self.params.strategy,
            input.model_poses,
            input.space_poses,
            ctx.is_cooperative()
        );

        let empty_reason = if model.is_empty() {
            Some(EmptyReason::EmptyModel)
        } else if space.is_empty() {
            Some(EmptyReason::EmptySpace)
        } else {
            None
        };
        if let Some(reason) = empty_reason {
            info!("OffsetSearch: {:?}, nothing to match", reason);
            return Ok(SearchReport {
                offsets: Vec::new(),
                trace: SearchTrace {
                    input,
                    strategy: self.params.strategy,
                    cooperative: ctx.is_cooperative(),
                    phases: SearchPhase::Generate.through(),
                    generation: GenerationStage::default(),
                    validation: ValidationStage::default(),
                    outcome: SearchOutcome::EmptyResult { reason },
                    timing: TimingBreakdown {
                        total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
                        ..Default::default()
                    },
                },
            });
        }

        let strategy = strategy_for(&self.params);
        let run = strategy.find_offsets(model, space, ctx)?;

        let (phases, outcome) = if !run.offsets.is_empty() {
            (
                SearchPhase::Emit.through(),
                SearchOutcome::Completed {
                    offsets: run.offsets.len(),
                },
            )
        } else {
            let last = run.last_phase.unwrap_or(SearchPhase::Generate);
            let reason = if run.generation.candidates == 0 {
                EmptyReason::NoCandidates
            } else {
                EmptyReason::NoneValidated
            };
            (last.through(), SearchOutcome::EmptyResult { reason })
        };

        match outcome {
            SearchOutcome::Completed { offsets } => info!(
                "OffsetSearch: {} offsets validated out of {} candidates",
                offsets, run.generation.candidates
            ),
            SearchOutcome::EmptyResult { reason } => {
                info!("OffsetSearch: empty result ({:?})", reason)
            }
        }

        Ok(SearchReport {
            offsets: run.offsets,
            trace: SearchTrace {
                input,
                strategy: strategy.kind(),
                cooperative: ctx.is_cooperative(),
                phases,
                generation: run.generation,
                validation: run.validation,
                outcome,
                timing: TimingBreakdown {
                    generate_ms: run.generate_ms,
                    validate_ms: run.validate_ms,
                    total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
                },
            },
        })
    }
}

const UNIT_SLACK: f32 = 1e-3;

/// The dot-product orientation filter assumes unit basis vectors, and an
/// orientation cannot be rebuilt from a forward axis parallel to up.
fn warn_non_unit_bases(label: &str, poses: &PoseList) {
    let mut skewed = 0usize;
    let mut collinear = 0usize;
    for pose in poses {
        let (forward, up) = (pose.forward(), pose.up());
        if (forward.norm() - 1.0).abs() > UNIT_SLACK || (up.norm() - 1.0).abs() > UNIT_SLACK {
            skewed += 1;
        }
        if forward.cross(&up).norm() <= UNIT_SLACK {
            collinear += 1;
        }
    }
    if skewed > 0 {
        warn!(
            "OffsetSearch: {} of {} {} poses have non-unit forward/up basis vectors",
            skewed,
            poses.len(),
            label
        );
    }
    if collinear > 0 {
        warn!(
            "OffsetSearch: {} of {} {} poses have parallel forward/up axes and no orientation",
            collinear,
            poses.len(),
            label
        );
    }
}
