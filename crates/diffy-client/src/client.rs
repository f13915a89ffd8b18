//! HTTP client for replaying requests against one backend

use crate::{BackendAddr, BackendError, ClientError, ReplayedRequest};
use bytes::Bytes;
use diffy_core::BackendOutcome;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Shared client used for every backend call
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    timeout: Option<Duration>,
}

impl BackendClient {
    /// Create a client. Without a timeout a hung backend call waits forever.
    pub fn new(timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self { client, timeout })
    }

    /// Per-call deadline, if one was configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Replay `request` against `backend`, folding any error into the outcome
    pub async fn send(&self, backend: &BackendAddr, request: &ReplayedRequest) -> BackendOutcome {
        match self.try_send(backend, request).await {
            Ok(body) => BackendOutcome::Success { body },
            Err(e) => BackendOutcome::failure(e.to_string()),
        }
    }

    /// Replay `request` against `backend` and return the full body of a
    /// `200 OK` response
    pub async fn try_send(
        &self,
        backend: &BackendAddr,
        request: &ReplayedRequest,
    ) -> Result<Bytes, BackendError> {
        let url = backend.target(&request.path_and_query);
        let mut outbound = self
            .client
            .request(request.method.clone(), url)
            .headers(request.forwarded_headers());

        if !request.body.is_empty() {
            outbound = outbound.body(request.body.clone());
        }

        let response = outbound.send().await.map_err(BackendError::Send)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(BackendError::Status(status));
        }

        response.bytes().await.map_err(BackendError::Body)
    }
}
