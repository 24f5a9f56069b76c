// tests/common/mod.rs
//
// Shared helpers: build the API router in-process with a pinned confidence
// source and drive it with tower::ServiceExt::oneshot (no sockets).
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _;

use rockburst_dashboard::api::{self, AppState};
use rockburst_dashboard::results::sample::sample_results;
use rockburst_dashboard::scoring::FixedConfidence;
use rockburst_dashboard::{MockPredictor, ResultsProvider};

pub const BODY_LIMIT: usize = 1024 * 1024;

pub fn state_with(results: ResultsProvider, delay: Duration, strict: bool) -> AppState {
    let predictor = MockPredictor::new(delay, Box::new(FixedConfidence(0.5))).strict(strict);
    AppState::new(results, Arc::new(predictor)).strict_features(strict)
}

/// Router over the sample document with no artificial delay.
pub fn test_router() -> Router {
    api::router(state_with(
        ResultsProvider::from_results(sample_results()),
        Duration::ZERO,
        false,
    ))
}

pub async fn call(app: &Router, method: &str, uri: &str, body: Option<Json>) -> (StatusCode, Json) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).expect("build request"))
        .await
        .expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Json::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, v)
}
