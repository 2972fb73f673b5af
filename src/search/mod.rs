//! Offset search orchestrating candidate generation and validation.
//!
//! Modules
//! - [`params`] – strategy selector and tolerance settings.
//! - `pipeline` – the [`OffsetSearch`] orchestrator.
//! - `strategy` – the [`OffsetStrategy`] seam and its two implementations.
//! - `context` – cancellation token and cooperative visualization hooks.
//! - `error` – structural failures surfaced to callers.

mod context;
mod error;
pub mod params;
mod pipeline;
mod strategy;

pub use context::{CancelToken, SearchContext};
pub use error::SearchError;
pub use params::{
    CompositionParams, IntersectionParams, SearchParams, StrategyKind, ValidationParams,
};
pub use pipeline::OffsetSearch;
pub use strategy::{
    strategy_for, CompositionStrategy, IntersectionStrategy, OffsetStrategy, StrategyRun,
};
