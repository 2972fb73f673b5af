//! Diagnostics data model returned by the offset search.
//!
//! [`SearchReport`] is the main entry point: the validated offsets plus a
//! [`SearchTrace`] describing the input, each stage the strategy ran, the
//! terminal outcome and a timing breakdown. Everything serializes to JSON
//! so a run can be inspected offline.

pub mod generation;
pub mod pipeline;
pub mod timing;
pub mod validation;

pub use generation::GenerationStage;
pub use pipeline::{EmptyReason, InputDescriptor, SearchOutcome, SearchPhase, SearchReport, SearchTrace};
pub use timing::TimingBreakdown;
pub use validation::{Rejection, ValidationStage};
