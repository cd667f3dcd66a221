//! Countdown timer state machine

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// Armed (or empty) and not counting
    Idle,
    /// Counting down, one decrement per tick
    Running,
    /// Halted mid-countdown, remaining time kept
    Paused,
    /// Ran out of time; only `set` or `reset` leave this phase
    Expired,
}

/// Countdown timer state
///
/// `remaining_seconds` never exceeds `duration_seconds`, and `Expired`
/// implies `remaining_seconds == 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Last duration committed via `set`
    pub duration_seconds: u64,
    /// Seconds left on the countdown
    pub remaining_seconds: u64,
    /// Current lifecycle phase
    pub phase: TimerPhase,
}

impl TimerState {
    /// Create an empty idle timer
    pub fn new() -> Self {
        Self {
            duration_seconds: 0,
            remaining_seconds: 0,
            phase: TimerPhase::Idle,
        }
    }

    /// Create an idle timer with a duration already committed
    pub fn with_duration(seconds: u64) -> Self {
        Self {
            duration_seconds: seconds,
            remaining_seconds: seconds,
            phase: TimerPhase::Idle,
        }
    }

    /// Commit a new duration, discarding any countdown in progress
    ///
    /// Allowed from every phase; a running countdown is cancelled by the
    /// transition back to `Idle`.
    pub fn set(&mut self, seconds: u64) {
        self.duration_seconds = seconds;
        self.remaining_seconds = seconds;
        self.phase = TimerPhase::Idle;
    }

    /// Begin or resume the countdown
    ///
    /// Only applies when there is time remaining and the timer is idle or
    /// paused; returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.remaining_seconds > 0
            && matches!(self.phase, TimerPhase::Idle | TimerPhase::Paused)
        {
            self.phase = TimerPhase::Running;
            true
        } else {
            false
        }
    }

    /// Halt a running countdown, keeping the remaining time
    ///
    /// Returns whether the transition happened; anything other than a
    /// running timer is left untouched.
    pub fn pause(&mut self) -> bool {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
            true
        } else {
            false
        }
    }

    /// Restore the committed duration and return to idle, from any phase
    pub fn reset(&mut self) {
        self.remaining_seconds = self.duration_seconds;
        self.phase = TimerPhase::Idle;
    }

    /// Advance the countdown by one second
    ///
    /// Only a running timer moves; a stale tick arriving after a pause or
    /// reset already changed the phase does nothing. Reaching zero
    /// transitions to `Expired`. Returns whether the tick applied.
    pub fn tick(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Expired;
        }
        true
    }

    /// Check if the countdown is currently running
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
