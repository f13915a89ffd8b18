//! End-to-end shadow traffic scenarios
//!
//! Each test starts mock primary/candidate backends and a diffy ingress on
//! ephemeral local ports and drives them over real HTTP.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use diffy_api::{create_router, replay, AppState};
use diffy_client::{BackendAddr, BackendClient, DualDispatcher, ReplayedRequest};
use diffy_core::{Classification, Verdict};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn backend(router: Router) -> BackendAddr {
    let addr = serve(router).await;
    BackendAddr::parse(&format!("http://{}", addr)).unwrap()
}

/// Address of a port nobody listens on
async fn dead_backend() -> BackendAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    BackendAddr::parse(&format!("http://{}", addr)).unwrap()
}

fn state(primary: BackendAddr, candidate: BackendAddr) -> AppState {
    let dispatcher = DualDispatcher::new(BackendClient::new(None).unwrap(), primary, candidate);
    AppState::new(dispatcher)
}

/// Start diffy in front of the two backends and return its base URL
async fn start_diffy(state: AppState) -> String {
    let addr = serve(create_router(state)).await;
    format!("http://{}", addr)
}

fn json(body: &'static str) -> Router {
    Router::new().fallback(move || async move { body })
}

fn parse_report(text: &str) -> HashMap<String, u64> {
    text.lines()
        .filter_map(|line| line.split_once(": "))
        .map(|(k, v)| (k.to_string(), v.parse().unwrap()))
        .collect()
}

async fn report(client: &reqwest::Client, diffy: &str) -> String {
    client
        .get(format!("{}/result", diffy))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_all_match() {
    let diffy = start_diffy(state(
        backend(json(r#"{"id":7,"tags":["a","b"]}"#)).await,
        backend(json(r#"{"tags":["a","b"],"id":7}"#)).await,
    ))
    .await;
    let client = reqwest::Client::new();

    for i in 0..10 {
        let response = client
            .get(format!("{}/api/items/{}?expand=true", diffy, i))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    assert_eq!(
        report(&client, &diffy).await,
        "numTotal: 10\nnumDiff: 0\nnumMatch: 10\nnumIgnore: 0\n"
    );
}

#[tokio::test]
async fn test_primary_outage() {
    let diffy = start_diffy(state(dead_backend().await, backend(json("{}")).await)).await;
    let client = reqwest::Client::new();

    for _ in 0..5 {
        let response = client.get(format!("{}/api", diffy)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    assert_eq!(
        report(&client, &diffy).await,
        "numTotal: 5\nnumDiff: 0\nnumMatch: 0\nnumIgnore: 5\n"
    );
}

#[tokio::test]
async fn test_candidate_regression() {
    let state = state(
        backend(json(r#"{"status":"ok"}"#)).await,
        backend(json(r#"{"status":"error"}"#)).await,
    );

    let request = Arc::new(ReplayedRequest::new(
        reqwest::Method::GET,
        "/api/health",
        Default::default(),
        Bytes::new(),
    ));
    let result = replay(&state, request).await;

    assert_eq!(result.outcome.classification, Classification::Diff);
    let comparison = result.outcome.comparison.unwrap();
    assert_eq!(comparison.verdict, Verdict::StructuralMismatch);
    assert_eq!(comparison.report, r#"!! status: "ok", "error""#);
    assert_eq!(result.snapshot.total, 1);
    assert_eq!(result.snapshot.diffed, 1);
}

#[tokio::test]
async fn test_invalid_payload_is_a_diff() {
    let state = state(
        backend(json("<html>oops</html>")).await,
        backend(json(r#"{"ok":true}"#)).await,
    );

    let request = Arc::new(ReplayedRequest::new(
        reqwest::Method::GET,
        "/page",
        Default::default(),
        Bytes::new(),
    ));
    let result = replay(&state, request).await;

    assert_eq!(result.outcome.classification, Classification::Diff);
    assert_eq!(
        result.outcome.comparison.map(|c| c.verdict),
        Some(Verdict::PrimaryInvalid)
    );
}

#[tokio::test]
async fn test_counters_grow_by_one_per_request() {
    let primary = Router::new()
        .route("/same", get(|| async { r#"{"v":1}"# }))
        .route("/differ", get(|| async { r#"{"v":1}"# }))
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let candidate = Router::new()
        .route("/same", get(|| async { r#"{"v":1}"# }))
        .route("/differ", get(|| async { r#"{"v":2}"# }))
        .route("/broken", get(|| async { r#"{"v":1}"# }));

    let diffy = start_diffy(state(backend(primary).await, backend(candidate).await)).await;
    let client = reqwest::Client::new();

    let paths = ["/same", "/differ", "/broken", "/same", "/missing", "/differ"];
    for (i, path) in paths.iter().enumerate() {
        let body = client
            .get(format!("{}{}", diffy, path))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let counts = parse_report(&body);
        assert_eq!(counts["numTotal"], i as u64 + 1);
        assert!(counts["numMatch"] + counts["numDiff"] <= counts["numTotal"]);

        // Reading the report never counts as a request
        let counts = parse_report(&report(&client, &diffy).await);
        assert_eq!(counts["numTotal"], i as u64 + 1);
    }

    let counts = parse_report(&report(&client, &diffy).await);
    assert_eq!(counts["numMatch"], 2);
    assert_eq!(counts["numDiff"], 2);
    // /broken fails on the primary, /missing fails on both
    assert_eq!(counts["numIgnore"], 2);
}

#[tokio::test]
async fn test_request_body_reaches_both_backends() {
    let echo = || {
        Router::new().fallback(|body: Bytes| async move {
            format!("{{\"received\":{}}}", String::from_utf8_lossy(&body))
        })
    };
    let diffy = start_diffy(state(backend(echo()).await, backend(echo()).await)).await;
    let client = reqwest::Client::new();

    let body = client
        .post(format!("{}/orders", diffy))
        .body(r#"{"sku":"abc","qty":2}"#)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(
        body,
        "numTotal: 1\nnumDiff: 0\nnumMatch: 1\nnumIgnore: 0\n"
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_all_counted() {
    let slow = || {
        Router::new().fallback(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            r#"{"ok":true}"#
        })
    };
    let diffy = start_diffy(state(backend(slow()).await, backend(slow()).await)).await;
    let client = reqwest::Client::new();

    let requests = 64;
    let mut tasks = JoinSet::new();
    for i in 0..requests {
        let client = client.clone();
        let url = format!("{}/concurrent/{}", diffy, i);
        tasks.spawn(async move { client.get(url).send().await.unwrap().status() });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), reqwest::StatusCode::OK);
    }

    let counts = parse_report(&report(&client, &diffy).await);
    assert_eq!(counts["numTotal"], requests);
    assert_eq!(counts["numMatch"], requests);
}
