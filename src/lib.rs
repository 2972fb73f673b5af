#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod io;
pub mod search;
pub mod session;
pub mod types;
pub mod visualize;

// Building blocks of the two strategies. Public for tools and tests, but
// considered internals.
pub mod angle;
pub mod config;
pub mod generate;
pub mod spatial;
pub mod tolerance;
pub mod validate;

// --- High-level re-exports -------------------------------------------------

// Main entry points: search + results.
pub use crate::search::{
    CancelToken, OffsetSearch, SearchContext, SearchError, SearchParams, StrategyKind,
};
pub use crate::session::{SearchHandle, SearchSession};
pub use crate::types::{Offset, PoseList, RigidTransform, ValidatedOffset};

// Diagnostics returned by the search.
pub use crate::diagnostics::{SearchReport, SearchTrace};

// Visualization sinks for the cooperative mode.
pub use crate::visualize::{ChannelSink, NullSink, Placement, PoseSink};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use pose_offsets::prelude::*;
/// use nalgebra::Vector3;
///
/// # fn main() {
/// let model = PoseList::new(vec![RigidTransform::identity()]);
/// let space = PoseList::new(vec![RigidTransform::from_translation(Vector3::new(1.0, 2.0, 3.0))]);
///
/// let search = OffsetSearch::new(SearchParams::default());
/// let report = search.search_with_report(&model, &space).expect("valid input");
/// println!("offsets={} total_ms={:.3}", report.offsets.len(), report.trace.timing.total_ms);
/// # }
/// ```
pub mod prelude {
    pub use crate::{OffsetSearch, PoseList, RigidTransform, SearchParams, StrategyKind};
}
