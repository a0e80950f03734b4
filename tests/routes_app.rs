mod common;

use axum::Router;
use axum::http::{StatusCode, header};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tinylink::routes::{RouterOptions, app_router};
use tinylink::state::AppState;

fn make_server(state: AppState) -> TestServer {
    let options = RouterOptions {
        rate_limit: None,
        ..RouterOptions::default()
    };
    let app = Router::new().fallback_service(app_router(state, options));

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_then_redirect() {
    let (state, _repository, _cache) = common::create_test_state();
    let server = make_server(state);

    let created = server
        .post("/api/v1/shorten")
        .json(&json!({ "url": "https://example.com/round/trip" }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let shortcode = created.json::<serde_json::Value>()["shortcode"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{shortcode}")).await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.header(header::LOCATION),
        "https://example.com/round/trip"
    );
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let (state, _repository, _cache) = common::create_test_state();
    let server = make_server(state);

    server.get("/health/").await.assert_status_ok();
}

#[tokio::test]
async fn test_unknown_api_route_is_not_a_redirect() {
    let (state, _repository, _cache) = common::create_test_state();
    let server = make_server(state);

    let response = server.get("/api/v1/unknown").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_request_deadline_returns_503_and_cancels_store_call() {
    let repository = Arc::new(common::SlowRepository::new(Duration::from_secs(2)));
    let state = common::create_state(
        Arc::new(common::SequenceCounter::starting_at(0)),
        repository.clone(),
        Arc::new(common::MemoryCache::new()),
    );
    let options = RouterOptions {
        request_timeout: Duration::from_secs(1),
        rate_limit: None,
    };
    let app = Router::new().fallback_service(app_router(state, options));
    let server = TestServer::new(app).unwrap();

    let response = server.get("/abc1234").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    // Past the point where the store call would have finished.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!repository.finished.load(Ordering::SeqCst));
}
