//! Per-search execution context: cancellation and cooperative yielding.

use super::error::SearchError;
use crate::types::RigidTransform;
use crate::visualize::PoseSink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep while waiting out a visualization delay.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Shared flag a caller sets to abandon an in-flight search.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

struct Cooperative<'a> {
    sink: &'a mut dyn PoseSink,
    delay: Duration,
}

/// Execution context threaded through a strategy run.
///
/// Without a sink the context only carries the cancellation token. With a
/// sink every [`SearchContext::present`] call hands a pose to the sink and
/// waits `delay`, polling the token while it waits.
#[derive(Default)]
pub struct SearchContext<'a> {
    cancel: CancelToken,
    cooperative: Option<Cooperative<'a>>,
}

impl<'a> SearchContext<'a> {
    pub fn new(cancel: CancelToken) -> Self {
        Self {
            cancel,
            cooperative: None,
        }
    }

    /// Enable cooperative mode with a visualization sink and fixed delay.
    pub fn with_visualization(mut self, sink: &'a mut dyn PoseSink, delay: Duration) -> Self {
        self.cooperative = Some(Cooperative { sink, delay });
        self
    }

    pub fn is_cooperative(&self) -> bool {
        self.cooperative.is_some()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Fail with [`SearchError::Cancelled`] once cancellation was requested.
    pub fn checkpoint(&self) -> Result<(), SearchError> {
        if self.cancel.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Suspension point of the cooperative mode. A no-op apart from the
    /// cancellation check when no sink is attached.
    pub fn present(
        &mut self,
        slot: usize,
        pose: &RigidTransform,
        active: bool,
    ) -> Result<(), SearchError> {
        if let Some(coop) = self.cooperative.as_mut() {
            coop.sink.place(slot, pose, active);
            let deadline = Instant::now() + coop.delay;
            loop {
                if self.cancel.is_cancelled() {
                    return Err(SearchError::Cancelled);
                }
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep((deadline - now).min(CANCEL_POLL));
            }
        }
        self.checkpoint()
    }
}
