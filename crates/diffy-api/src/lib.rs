//! diffy ingress
//!
//! Accepts mirrored traffic, replays every request against the primary and
//! candidate backends and answers with the current counters. The report paths
//! (`/` without a query, and `/result`) only read the counters.
//!
//! Backend failures never show up in the inbound response: every comparison
//! request gets `200 OK` with the report, so the traffic mirror upstream has
//! no reason to retry.

mod pipeline;

pub use pipeline::{record_unreadable, replay, Replay};

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::header,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use diffy_client::{DualDispatcher, ReplayedRequest};
use diffy_compare::DiffOptions;
use diffy_core::{CounterSnapshot, RunCounters};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: DualDispatcher,
    pub counters: Arc<RunCounters>,
    pub diff_options: Arc<DiffOptions>,
}

impl AppState {
    /// State with fresh counters and the default diff markers
    pub fn new(dispatcher: DualDispatcher) -> Self {
        Self {
            dispatcher,
            counters: Arc::new(RunCounters::new()),
            diff_options: Arc::new(DiffOptions::default()),
        }
    }

    #[cfg(test)]
    fn with_diff_options(mut self, options: DiffOptions) -> Self {
        self.diff_options = Arc::new(options);
        self
    }
}

/// Create the ingress router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(show_root))
        .route("/result", any(show_result))
        .fallback(handle_request)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the ingress server
pub async fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Ingress listening on {}", addr);
    axum::serve(listener, router).await
}

// ==================== Handlers ====================

/// /result, with or without a query
async fn show_result(State(state): State<AppState>) -> Response {
    report(state.counters.snapshot())
}

/// `/` is a report read only when the target is exactly `/`; `/?x=1` is
/// replayed like any other request
async fn show_root(State(state): State<AppState>, request: Request) -> Response {
    if request.uri().query().is_some() {
        return handle_request(State(state), request).await;
    }
    report(state.counters.snapshot())
}

/// Any other target: replay against both backends
async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let body = match to_bytes(body, usize::MAX).await {
        Ok(body) => body,
        Err(e) => {
            warn!(path = parts.uri.path(), "Failed to read inbound body: {}", e);
            let reason = format!("failed to read inbound body: {}", e);
            let query = parts.uri.query().unwrap_or("");
            return report(record_unreadable(&state, parts.uri.path(), query, reason).snapshot);
        }
    };

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let replayed = Arc::new(ReplayedRequest::new(
        parts.method,
        path_and_query,
        parts.headers,
        body,
    ));

    // The pipeline runs on its own task so that a caller hanging up does not
    // cancel the backend calls or skip counting
    let counters = state.counters.clone();
    let pipeline = tokio::spawn(async move { replay(&state, replayed).await.snapshot });

    match pipeline.await {
        Ok(snapshot) => report(snapshot),
        Err(e) => {
            error!("Comparison task failed: {}", e);
            report(counters.snapshot())
        }
    }
}

fn report(snapshot: CounterSnapshot) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        snapshot.to_string(),
    )
        .into_response()
}
