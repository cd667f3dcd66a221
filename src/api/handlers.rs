//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::state::AppState;
use super::responses::{format_clock, start_label, ApiResponse, HealthResponse, StatusResponse};

/// Blocking notice returned when the submitted duration is unusable
const INVALID_DURATION_NOTICE: &str = "Please enter a valid duration.";

/// Request body for POST /set
#[derive(Debug, Deserialize)]
pub struct SetRequest {
    /// Duration in seconds; a JSON number or a numeric string
    #[serde(default)]
    pub duration_seconds: Value,
}

/// Convert the submitted duration into whole seconds
///
/// Mirrors a numeric input field: accepts a JSON number or a numeric
/// string, rejects anything that is not a positive whole number.
fn parse_duration_seconds(raw: &Value) -> Result<u64, String> {
    let value = match raw {
        Value::Number(n) => {
            if let Some(seconds) = n.as_u64() {
                return validate_seconds(seconds as f64);
            }
            n.as_f64().ok_or_else(|| INVALID_DURATION_NOTICE.to_string())?
        }
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| INVALID_DURATION_NOTICE.to_string())?,
        _ => return Err(INVALID_DURATION_NOTICE.to_string()),
    };

    validate_seconds(value)
}

/// Require a positive whole number of seconds
fn validate_seconds(value: f64) -> Result<u64, String> {
    if value.is_finite() && value > 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(INVALID_DURATION_NOTICE.to_string())
    }
}

/// Handle POST /set - Commit a countdown duration
pub async fn set_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetRequest>,
) -> Response {
    let seconds = match parse_duration_seconds(&request.duration_seconds) {
        Ok(seconds) => seconds,
        Err(notice) => {
            warn!("Rejected duration input {}: {}", request.duration_seconds, notice);
            // Prior state is left untouched and echoed back with the notice
            return match state.get_timer_state() {
                Ok(timer) => {
                    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(notice, timer)))
                        .into_response()
                }
                Err(e) => {
                    error!("Failed to get timer state: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            };
        }
    };

    match state.set_duration(seconds) {
        Ok(timer) => {
            info!("Set endpoint called - duration committed: {} seconds", seconds);
            Json(ApiResponse::ok(
                format!("Duration set to {} seconds", seconds),
                timer,
            ))
            .into_response()
        }
        Err(e) => {
            error!("Failed to commit duration: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok((timer, true)) => {
            info!("Start endpoint called - countdown running");
            Ok(Json(ApiResponse::ok("Countdown started".to_string(), timer)))
        }
        Ok((timer, false)) => {
            let message = if timer.is_running() {
                "Start ignored, countdown already running"
            } else {
                "Start ignored, nothing to count down"
            };
            info!("Start endpoint called - {}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok((timer, true)) => {
            info!("Pause endpoint called - countdown paused");
            Ok(Json(ApiResponse::ok("Countdown paused".to_string(), timer)))
        }
        Ok((timer, false)) => {
            info!("Pause endpoint called - countdown not running, ignored");
            Ok(Json(ApiResponse::ok(
                "Pause ignored, countdown is not running".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Restore the committed duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(timer) => {
            info!("Reset endpoint called - countdown reset");
            Ok(Json(ApiResponse::ok("Countdown reset".to_string(), timer)))
        }
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current countdown status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        display: format_clock(timer.remaining_seconds),
        start_label: start_label(&timer).to_string(),
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
