//! Countdown - A state-managed HTTP server for countdown timer control
//!
//! This is the main entry point for the countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, initial duration={}",
          config.host, config.port,
          config.duration.map_or("none".to_string(), |d| format!("{}s", d)));

    // An initial duration must be usable by a later start
    if config.duration == Some(0) {
        tracing::error!("Initial duration must be a positive number of seconds");
        std::process::exit(1);
    }

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.duration));

    // Start the countdown ticking background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /set    - Commit a countdown duration in seconds");
    info!("  POST /start  - Start or resume the countdown");
    info!("  POST /pause  - Pause the running countdown");
    info!("  POST /reset  - Restore the committed duration");
    info!("  GET  /status - Current phase, remaining time and display");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Dropping the runtime cancels the countdown task and any pending tick
    info!("Server shutdown complete");
    Ok(())
}
