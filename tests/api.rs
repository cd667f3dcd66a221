//! HTTP API integration tests
//!
//! These drive the full router in memory. The ticking task is not spawned,
//! so the countdown only moves through explicit control requests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use countdown::{api::create_router, state::AppState};

fn test_app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), None));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn set_commits_duration() {
    let (state, app) = test_app();

    let response = app
        .oneshot(post_json("/set", json!({ "duration_seconds": 90 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 90);
    assert_eq!(body["timer"]["duration_seconds"], 90);
    assert_eq!(body["display"], "01:30");

    let timer = state.get_timer_state().unwrap();
    assert_eq!(timer.remaining_seconds, 90);
}

#[tokio::test]
async fn set_accepts_numeric_strings() {
    let (_, app) = test_app();

    let response = app
        .oneshot(post_json("/set", json!({ "duration_seconds": "45" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["timer"]["remaining_seconds"], 45);
    assert_eq!(body["display"], "00:45");
}

#[tokio::test]
async fn set_rejects_invalid_input_and_keeps_prior_state() {
    let (state, app) = test_app();

    // Commit a valid duration first so there is prior state to preserve
    let response = app
        .clone()
        .oneshot(post_json("/set", json!({ "duration_seconds": 30 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for bad in [json!(0), json!(-5), json!(1.5), json!("abc"), Value::Null] {
        let response = app
            .clone()
            .oneshot(post_json("/set", json!({ "duration_seconds": bad })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Please enter a valid duration.");
        assert_eq!(body["timer"]["remaining_seconds"], 30);
    }

    let timer = state.get_timer_state().unwrap();
    assert_eq!(timer.duration_seconds, 30);
    assert_eq!(timer.remaining_seconds, 30);
}

#[tokio::test]
async fn start_with_nothing_to_count_is_ignored() {
    let (state, app) = test_app();

    let response = app.oneshot(post("/start")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["message"], "Start ignored, nothing to count down");
    assert!(!state.get_timer_state().unwrap().is_running());
}

#[tokio::test]
async fn control_flow_start_pause_resume_reset() {
    let (_, app) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/set", json!({ "duration_seconds": 120 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Start
    let body = body_json(app.clone().oneshot(post("/start")).await.unwrap()).await;
    assert_eq!(body["status"], "running");

    // Status while running shows the clock and the plain start label
    let body = body_json(app.clone().oneshot(get("/status")).await.unwrap()).await;
    assert_eq!(body["timer"]["phase"], "running");
    assert_eq!(body["display"], "02:00");
    assert_eq!(body["start_label"], "Start");

    // Pause keeps the remaining time and relabels the start control
    let body = body_json(app.clone().oneshot(post("/pause")).await.unwrap()).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 120);

    let body = body_json(app.clone().oneshot(get("/status")).await.unwrap()).await;
    assert_eq!(body["start_label"], "Resume");

    // Resume
    let body = body_json(app.clone().oneshot(post("/start")).await.unwrap()).await;
    assert_eq!(body["status"], "running");

    // Reset returns to the committed duration
    let body = body_json(app.clone().oneshot(post("/reset")).await.unwrap()).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 120);
    assert_eq!(body["display"], "02:00");
}

#[tokio::test]
async fn pause_when_not_running_is_ignored() {
    let (_, app) = test_app();

    let body = body_json(app.oneshot(post("/pause")).await.unwrap()).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["message"], "Pause ignored, countdown is not running");
}

#[tokio::test]
async fn status_reports_server_metadata() {
    let (_, app) = test_app();

    app.clone()
        .oneshot(post_json("/set", json!({ "duration_seconds": 10 })))
        .await
        .unwrap();

    let body = body_json(app.oneshot(get("/status")).await.unwrap()).await;
    assert_eq!(body["host"], "127.0.0.1");
    assert_eq!(body["port"], 0);
    assert_eq!(body["last_action"], "set");
    assert!(body["last_action_time"].is_string());
    assert!(body["uptime"].is_string());
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, app) = test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}
