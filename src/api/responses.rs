//! API response structures and display rendering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TimerPhase, TimerState};

/// Format a second count as a zero-padded MM:SS clock
///
/// Minutes beyond 99 widen the field naturally rather than wrapping.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Label for the start control: a paused countdown resumes
pub fn start_label(timer: &TimerState) -> &'static str {
    if timer.phase == TimerPhase::Paused && timer.remaining_seconds > 0 {
        "Resume"
    } else {
        "Start"
    }
}

/// Status string for a control response, echoing the resulting phase
fn phase_status(timer: &TimerState) -> &'static str {
    match timer.phase {
        TimerPhase::Idle => "idle",
        TimerPhase::Running => "running",
        TimerPhase::Paused => "paused",
        TimerPhase::Expired => "expired",
    }
}

/// API response structure for the control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
    pub display: String,
}

impl ApiResponse {
    /// Create a response for an accepted control request
    pub fn ok(message: String, timer: TimerState) -> Self {
        Self {
            status: phase_status(&timer).to_string(),
            message,
            display: format_clock(timer.remaining_seconds),
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response for a rejected request, carrying the unchanged state
    pub fn error(message: String, timer: TimerState) -> Self {
        Self {
            status: "error".to_string(),
            message,
            display: format_clock(timer.remaining_seconds),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Status response with the rendered display and control labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub display: String,
    pub start_label: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
