//! Concurrent dispatch to the primary and candidate backends

use crate::{BackendAddr, BackendClient, ReplayedRequest};
use diffy_core::BackendOutcome;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// Sends each replayed request to both backends at once
#[derive(Debug, Clone)]
pub struct DualDispatcher {
    client: BackendClient,
    primary: BackendAddr,
    candidate: BackendAddr,
}

impl DualDispatcher {
    pub fn new(client: BackendClient, primary: BackendAddr, candidate: BackendAddr) -> Self {
        Self {
            client,
            primary,
            candidate,
        }
    }

    pub fn primary(&self) -> &BackendAddr {
        &self.primary
    }

    pub fn candidate(&self) -> &BackendAddr {
        &self.candidate
    }

    /// Replay `request` against both backends and wait for both answers
    ///
    /// Each call runs on its own task, so one side hanging never keeps the
    /// other from starting or finishing, and dropping the returned future
    /// does not cancel either call. The pair always comes back as
    /// `(primary, candidate)` whichever finished first.
    pub async fn dispatch(&self, request: Arc<ReplayedRequest>) -> (BackendOutcome, BackendOutcome) {
        let primary = self.spawn_call(self.primary.clone(), request.clone());
        let candidate = self.spawn_call(self.candidate.clone(), request);

        let (primary, candidate) = tokio::join!(primary, candidate);
        (joined("primary", primary), joined("candidate", candidate))
    }

    fn spawn_call(
        &self,
        backend: BackendAddr,
        request: Arc<ReplayedRequest>,
    ) -> JoinHandle<BackendOutcome> {
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = client.send(&backend, &request).await;
            debug!(
                backend = %backend,
                success = outcome.is_success(),
                "Backend call finished"
            );
            outcome
        })
    }
}

fn joined(side: &str, result: Result<BackendOutcome, JoinError>) -> BackendOutcome {
    result.unwrap_or_else(|e| BackendOutcome::failure(format!("{} call aborted: {}", side, e)))
}
