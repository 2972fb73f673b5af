//! Background searches with a cancellable result handle.
//!
//! A [`SearchSession`] holds the two pose sets read-only behind `Arc`s and
//! submits each search to its own worker thread. The caller gets a
//! [`SearchHandle`] back: the result (or the error) arrives over a channel,
//! and dropping or cancelling the handle stops the worker at its next
//! checkpoint.

use crate::diagnostics::SearchReport;
use crate::search::{CancelToken, OffsetSearch, SearchContext, SearchError, SearchParams, StrategyKind};
use crate::types::PoseList;
use crate::visualize::PoseSink;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

type SearchResult = Result<SearchReport, SearchError>;

/// Model/space pair plus the parameters searches on it run with.
#[derive(Clone, Debug)]
pub struct SearchSession {
    model: Arc<PoseList>,
    space: Arc<PoseList>,
    params: SearchParams,
}

impl SearchSession {
    pub fn new(model: PoseList, space: PoseList, params: SearchParams) -> Self {
        Self {
            model: Arc::new(model),
            space: Arc::new(space),
            params,
        }
    }

    pub fn model(&self) -> &PoseList {
        &self.model
    }

    pub fn space(&self) -> &PoseList {
        &self.space
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Start a search with the session parameters.
    pub fn find_offsets(&self) -> SearchHandle {
        let search = OffsetSearch::new(self.params.clone());
        let (model, space) = (Arc::clone(&self.model), Arc::clone(&self.space));
        spawn_search("pose-offsets-search", move |cancel| {
            let mut ctx = SearchContext::new(cancel);
            search.search_with_context(&model, &space, &mut ctx)
        })
    }

    /// Start a cooperative composition search that hands every tested pose
    /// to `sink` and pauses `delay` after each one.
    ///
    /// The strategy is forced to composition; the other session parameters
    /// are kept.
    pub fn find_offsets_with_visualization<S>(&self, sink: S, delay: Duration) -> SearchHandle
    where
        S: PoseSink + Send + 'static,
    {
        let mut params = self.params.clone();
        params.strategy = StrategyKind::Composition;
        let search = OffsetSearch::new(params);
        let (model, space) = (Arc::clone(&self.model), Arc::clone(&self.space));
        spawn_search("pose-offsets-visual", move |cancel| {
            let mut sink = sink;
            let mut ctx = SearchContext::new(cancel).with_visualization(&mut sink, delay);
            search.search_with_context(&model, &space, &mut ctx)
        })
    }
}

fn spawn_search<F>(name: &str, job: F) -> SearchHandle
where
    F: FnOnce(CancelToken) -> SearchResult + Send + 'static,
{
    let cancel = CancelToken::new();
    let (sender, receiver) = bounded(1);
    let worker_cancel = cancel.clone();
    let spawned = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let result = job(worker_cancel);
            if let Err(err) = &result {
                debug!("search worker finished with error: {err}");
            }
            // The handle may already be gone.
            let _ = sender.send(result);
        });

    match spawned {
        Ok(worker) => SearchHandle {
            cancel,
            receiver,
            worker: Some(worker),
            outcome: None,
        },
        Err(err) => {
            warn!("failed to spawn search worker: {err}");
            SearchHandle {
                cancel,
                receiver,
                worker: None,
                outcome: Some(Err(SearchError::WorkerLost)),
            }
        }
    }
}

/// Handle to an in-flight search.
///
/// Dropping the handle cancels the search.
#[derive(Debug)]
pub struct SearchHandle {
    cancel: CancelToken,
    receiver: Receiver<SearchResult>,
    worker: Option<JoinHandle<()>>,
    outcome: Option<SearchResult>,
}

impl SearchHandle {
    /// Ask the worker to stop at its next checkpoint. The result then
    /// resolves to [`SearchError::Cancelled`] unless it already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Non-blocking poll. `None` while the search is still running.
    pub fn try_result(&mut self) -> Option<&SearchResult> {
        if self.outcome.is_none() {
            match self.receiver.try_recv() {
                Ok(result) => self.outcome = Some(result),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.outcome = Some(Err(SearchError::WorkerLost))
                }
            }
        }
        self.outcome.as_ref()
    }

    pub fn is_finished(&mut self) -> bool {
        self.try_result().is_some()
    }

    /// Block until the search completes and return its result.
    pub fn wait(mut self) -> SearchResult {
        let result = match self.outcome.take() {
            Some(result) => result,
            None => self
                .receiver
                .recv()
                .unwrap_or(Err(SearchError::WorkerLost)),
        };
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("search worker panicked after reporting");
            }
        }
        result
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.cancel.cancel();
        }
    }
}
