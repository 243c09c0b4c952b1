//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use escrow_core::ids::AccountId;
use escrow_store::{InMemoryScheduleStore, InMemoryTokenLedger};
use escrow_test_support::ManualClock;
use http_body_util::BodyExt;
use tower::ServiceExt;

use escrow_api::routes;
use escrow_api::state::AppState;

/// Fixed starting timestamp used across all integration tests.
pub const T: i64 = 1_768_471_200;

/// Build the full app router over a fresh store and ledger, reading time from
/// `clock`. Uses the same route structure as `main.rs`.
pub fn build_test_app(clock: Arc<ManualClock>) -> Router {
    let ledger = Arc::new(InMemoryTokenLedger::new(AccountId::new_v4()));
    let app_state = AppState::new(clock, Arc::new(InMemoryScheduleStore::new()), ledger);

    routes::router().with_state(app_state)
}

/// A manual clock starting at `T`.
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at_unix(T))
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Mint a token to `owner` and approve escrow to move it. Returns its id.
pub async fn mint_and_approve(app: &Router, owner: AccountId) -> u64 {
    let body = serde_json::json!({ "owner": owner });
    let (status, json) = post_json(app.clone(), "/api/v1/tokens/mint", &body).await;
    assert_eq!(status, StatusCode::CREATED);
    let asset_id = json["asset_id"].as_u64().unwrap();

    let (status, _) = post_json(
        app.clone(),
        &format!("/api/v1/tokens/{asset_id}/approve"),
        &body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    asset_id
}
