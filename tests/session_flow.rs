// tests/session_flow.rs
//
// Predictor session over HTTP: set-field, deferred predict, reset, and
// last-write-wins between overlapping predictions. Time is paused so the
// artificial delay elapses instantly.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use serde_json::{json, Value as Json};

use common::{call, state_with};
use rockburst_dashboard::api;
use rockburst_dashboard::results::sample::sample_results;
use rockburst_dashboard::{FeatureRecord, ResultsProvider};

const DELAY: Duration = Duration::from_millis(1500);

fn app(strict: bool) -> Router {
    api::router(state_with(
        ResultsProvider::from_results(sample_results()),
        DELAY,
        strict,
    ))
}

/// Poll the session until `status` shows up (bounded).
async fn wait_for(app: &Router, status: &str) -> Json {
    for _ in 0..100 {
        let (_, v) = call(app, "GET", "/api/session", None).await;
        if v["status"] == json!(status) {
            return v;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("session never reached '{status}'");
}

#[tokio::test(start_paused = true)]
async fn fresh_session_is_idle_with_defaults() {
    let app = app(false);
    let (status, v) = call(&app, "GET", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], json!("idle"));
    assert_eq!(v["prediction"], Json::Null);
    assert_eq!(v["form"], serde_json::to_value(FeatureRecord::with_defaults()).unwrap());
}

#[tokio::test(start_paused = true)]
async fn predict_is_pending_then_ready() {
    let app = app(false);
    let (status, v) = call(&app, "POST", "/api/session/predict", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(v["status"], json!("pending"));
    let ticket = v["ticket"].clone();

    let (_, s) = call(&app, "GET", "/api/session", None).await;
    assert_eq!(s["status"], json!("pending"));
    assert_eq!(s["pending_ticket"], ticket);

    let s = wait_for(&app, "ready").await;
    // defaults: total 0.605 -> level 2, FixedConfidence(0.5) -> 82.5
    assert_eq!(s["prediction"]["level"], json!(2));
    assert_eq!(s["prediction"]["confidence"].as_f64(), Some(82.5));
    assert!(s.get("predicted_at").is_some());
}

#[tokio::test(start_paused = true)]
async fn set_field_updates_form_and_rejects_unknown() {
    let app = app(false);
    let (status, v) = call(
        &app,
        "POST",
        "/api/session/field",
        Some(json!({ "name": "axial_stress", "value": 0.1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["form"]["axial_stress"].as_f64(), Some(0.1));

    let (status, v) = call(
        &app,
        "POST",
        "/api/session/field",
        Some(json!({ "name": "tangential_stress", "value": 0.9 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(v["error"], json!("invalid_field"));
}

#[tokio::test(start_paused = true)]
async fn later_predict_wins_over_earlier_one() {
    let app = app(false);
    call(&app, "POST", "/api/session/predict", None).await;

    // drive every scoring field to 1.0 and predict again while the first is pending
    for name in rockburst_dashboard::features::SCORING_FIELDS {
        call(
            &app,
            "POST",
            "/api/session/field",
            Some(json!({ "name": name, "value": 1.0 })),
        )
        .await;
    }
    let (_, second) = call(&app, "POST", "/api/session/predict", None).await;

    let s = wait_for(&app, "ready").await;
    // let the first task finish too; it must not overwrite the newer result
    tokio::time::sleep(DELAY * 2).await;
    let (_, s2) = call(&app, "GET", "/api/session", None).await;

    assert_eq!(s["prediction"]["level"], json!(3));
    assert_eq!(s2["prediction"], s["prediction"]);
    assert!(second["ticket"].as_u64().unwrap() > 1);
}

#[tokio::test(start_paused = true)]
async fn reset_clears_prediction_and_restores_defaults() {
    let app = app(false);
    call(
        &app,
        "POST",
        "/api/session/field",
        Some(json!({ "name": "density", "value": 4.2 })),
    )
    .await;
    call(&app, "POST", "/api/session/predict", None).await;
    wait_for(&app, "ready").await;

    let (status, v) = call(&app, "POST", "/api/session/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], json!("idle"));
    assert_eq!(v["prediction"], Json::Null);
    assert_eq!(v["form"], serde_json::to_value(FeatureRecord::with_defaults()).unwrap());
}

#[tokio::test(start_paused = true)]
async fn reset_while_pending_discards_late_result() {
    let app = app(false);
    call(&app, "POST", "/api/session/predict", None).await;
    call(&app, "POST", "/api/session/reset", None).await;

    tokio::time::sleep(DELAY * 2).await;
    let (_, v) = call(&app, "GET", "/api/session", None).await;
    assert_eq!(v["status"], json!("idle"));
    assert_eq!(v["prediction"], Json::Null);
}

#[tokio::test(start_paused = true)]
async fn strict_failure_is_reported_on_the_session() {
    let app = app(true);
    call(
        &app,
        "POST",
        "/api/session/field",
        Some(json!({ "name": "location_mine_b", "value": 1.0 })),
    )
    .await;
    call(&app, "POST", "/api/session/predict", None).await;

    let v = wait_for(&app, "idle").await;
    let err = v["last_error"].as_str().unwrap();
    assert!(err.contains("location"), "{err}");
}
