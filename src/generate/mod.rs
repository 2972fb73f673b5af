//! Offset candidate generators.
//!
//! - [`intersection`]: translation candidates from orientation-filtered
//!   per-model-pose offset sets, intersected across the model.
//! - [`composition`]: rigid candidates `space_j * model_0⁻¹`, validated
//!   inline.
//! - [`candidates`]: the deduplicating candidate set and its membership
//!   rules.

pub mod candidates;
pub mod composition;
pub mod intersection;

pub use candidates::{CandidateSet, MembershipMode};
pub use composition::{CompositionOutput, CompositionSearch};
pub use intersection::{IntersectionGenerator, IntersectionOutput};
