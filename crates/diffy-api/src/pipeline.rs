//! Replay, classify, count and log one mirrored request

use crate::AppState;
use diffy_client::ReplayedRequest;
use diffy_compare::compare;
use diffy_core::{classify, BackendOutcome, Comparison, CounterSnapshot, Outcome};
use std::sync::Arc;

/// Everything one comparison produced
#[derive(Debug, Clone)]
pub struct Replay {
    pub outcome: Outcome,
    /// Counters right after this request was counted
    pub snapshot: CounterSnapshot,
}

/// Run the full comparison pipeline for one request
///
/// Both backend calls complete before anything is classified; the counters
/// are updated exactly once and the log lines are written afterwards.
pub async fn replay(state: &AppState, request: Arc<ReplayedRequest>) -> Replay {
    let (primary, candidate) = state.dispatcher.dispatch(request.clone()).await;

    let options = &state.diff_options;
    let outcome = classify(primary, candidate, |p, c| compare(p, c, options));
    let snapshot = state.counters.record(&outcome);
    outcome.log(request.path(), request.query());

    Replay { outcome, snapshot }
}

/// Count a request whose inbound body could not be read
///
/// Neither backend can be given the request, so both sides are failures with
/// the same reason and the request lands in `ignore` like any other
/// `ALL FAIL`.
pub fn record_unreadable(state: &AppState, path: &str, query: &str, reason: String) -> Replay {
    let primary = BackendOutcome::failure(reason.clone());
    let candidate = BackendOutcome::failure(reason);

    let outcome = classify(primary, candidate, |_, _| Comparison::full_match());
    let snapshot = state.counters.record(&outcome);
    outcome.log(path, query);

    Replay { outcome, snapshot }
}
