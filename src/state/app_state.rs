//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use super::TimerState;

/// Main application state that owns the countdown timer
#[derive(Debug)]
pub struct AppState {
    /// The countdown state machine
    pub timer: Arc<Mutex<TimerState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last control action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for control transitions (drives the countdown task)
    pub control_tx: broadcast::Sender<TimerState>,
    /// Channel mirroring the latest timer snapshot for observers
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState, optionally with an initial committed duration
    pub fn new(port: u16, host: String, initial_duration: Option<u64>) -> Self {
        let timer = match initial_duration {
            Some(seconds) => TimerState::with_duration(seconds),
            None => TimerState::new(),
        };
        let (control_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.clone());

        Self {
            timer: Arc::new(Mutex::new(timer)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            control_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a control transition to the timer and notify observers
    ///
    /// The mutator reports whether it changed anything; no-op transitions
    /// are not broadcast and do not update last-action tracking. Returns
    /// the resulting snapshot together with the applied flag.
    fn apply_control<F>(&self, action: &str, mutator: F) -> Result<(TimerState, bool), String>
    where
        F: FnOnce(&mut TimerState) -> bool,
    {
        // Lock the timer and apply the transition
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let applied = mutator(&mut *timer);
        let snapshot = timer.clone();
        drop(timer); // Release the lock early

        if !applied {
            return Ok((snapshot, false));
        }

        // Update last action tracking
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        // Wake the countdown task; it only has a subscriber once spawned
        if let Err(e) = self.control_tx.send(snapshot.clone()) {
            warn!("No control transition listener: {}", e);
        }
        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }

        Ok((snapshot, true))
    }

    /// Commit a new countdown duration
    ///
    /// The duration has already been validated as a positive whole number
    /// of seconds; any countdown in progress is cancelled.
    pub fn set_duration(&self, seconds: u64) -> Result<TimerState, String> {
        info!("Committing countdown duration: {} seconds", seconds);
        self.apply_control("set", |timer| {
            timer.set(seconds);
            true
        })
        .map(|(snapshot, _)| snapshot)
    }

    /// Start or resume the countdown
    pub fn start(&self) -> Result<(TimerState, bool), String> {
        self.apply_control("start", |timer| timer.start())
    }

    /// Pause the running countdown
    pub fn pause(&self) -> Result<(TimerState, bool), String> {
        self.apply_control("pause", |timer| timer.pause())
    }

    /// Reset the countdown to the committed duration
    pub fn reset(&self) -> Result<TimerState, String> {
        info!("Resetting countdown");
        self.apply_control("reset", |timer| {
            timer.reset();
            true
        })
        .map(|(snapshot, _)| snapshot)
    }

    /// Apply one tick to the timer (called by the countdown task)
    ///
    /// Ticks only move a running timer; an applied tick is published on the
    /// watch channel but never re-broadcast as a control transition.
    pub fn tick(&self) -> Result<TimerState, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let applied = timer.tick();
        let snapshot = timer.clone();
        drop(timer);

        if applied {
            if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
                warn!("Failed to send timer update: {}", e);
            }
        }

        Ok(snapshot)
    }

    /// Get the current timer snapshot
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.timer.lock()
            .map(|timer| timer.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last control action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
