//! Countdown ticking background task

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    time::interval,
};
use tracing::{debug, error, info, warn};

use crate::state::{AppState, TimerPhase, TimerState};

/// Fixed tick period: the countdown decrements once per second
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that drives the countdown while the timer is running
///
/// Waits for control transitions; entering `Running` schedules a repeating
/// one-second tick, and any transition out of `Running` cancels it within
/// the same select loop. The single task guarantees at most one live tick
/// schedule per process.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut control_rx = state.control_tx.subscribe();

    loop {
        // Wait for a control transition
        match control_rx.recv().await {
            Ok(snapshot) => {
                if snapshot.phase != TimerPhase::Running {
                    debug!("Timer not running (phase: {:?}), tick schedule stays clear",
                           snapshot.phase);
                    continue;
                }

                info!("Countdown running, {} seconds remaining", snapshot.remaining_seconds);
                run_ticking_loop(&state, &mut control_rx).await;
            }
            Err(RecvError::Lagged(missed)) => {
                warn!("Control channel lagged, {} transitions dropped", missed);
            }
            Err(RecvError::Closed) => {
                info!("Control channel closed, stopping countdown task");
                return;
            }
        }
    }
}

/// Tick the running countdown until it expires or is cancelled
async fn run_ticking_loop(state: &Arc<AppState>, control_rx: &mut Receiver<TimerState>) {
    let mut ticker = interval(TICK_PERIOD);
    // An interval's first tick completes immediately; consume it so the
    // first decrement lands a full period after start.
    ticker.tick().await;

    loop {
        tokio::select! {
            // Timer tick - advance the countdown by one second
            _ = ticker.tick() => {
                match state.tick() {
                    Ok(after) => match after.phase {
                        TimerPhase::Running => {
                            debug!("Tick, {} seconds remaining", after.remaining_seconds);
                        }
                        TimerPhase::Expired => {
                            info!("Countdown expired");
                            break;
                        }
                        _ => {
                            // A control transition won the race; the tick
                            // was a guarded no-op and the schedule stops
                            break;
                        }
                    },
                    Err(e) => {
                        error!("Failed to apply tick: {}", e);
                        break;
                    }
                }
            }

            // Control transition - cancel the tick schedule unless the
            // timer is still running
            result = control_rx.recv() => {
                match result {
                    Ok(transition) => {
                        if transition.phase != TimerPhase::Running {
                            info!("Countdown cancelled (phase: {:?}), {} seconds remaining",
                                  transition.phase, transition.remaining_seconds);
                            break;
                        }
                        debug!("Redundant running transition, tick schedule unchanged");
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // Keep ticking; a missed cancellation surfaces as a
                        // guarded no-op tick on the next period
                        warn!("Control channel lagged, {} transitions dropped", missed);
                    }
                    Err(RecvError::Closed) => {
                        break;
                    }
                }
            }
        }
    }
}
