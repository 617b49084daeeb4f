//! Live Price Stream Binary
//!
//! Runs the live price stream client against a configured endpoint and
//! logs status transitions and point counts. Useful for soaking the
//! reconnection path against a real backend.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin eigen-graph-stream -- rETH
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `EIGEN_GRAPH_WS_BASE`: WebSocket base URL, e.g. `wss://api.example.com`
//!
//! ## Optional
//! - `EIGEN_GRAPH_SYMBOL`: Token symbol when no CLI argument is given
//! - `EIGEN_GRAPH_MAX_POINTS`: Point buffer cap (default: 3000)
//! - `EIGEN_GRAPH_HEARTBEAT_TIMEOUT_MS`: Idle timeout (default: 20000)
//! - `EIGEN_GRAPH_BACKOFF_BASE_MS`: Initial reconnect delay (default: 1000)
//! - `EIGEN_GRAPH_BACKOFF_MAX_MS`: Maximum reconnect delay (default: 30000)
//! - `EIGEN_GRAPH_FLUSH_INTERVAL_MS`: Point flush interval (default: 16)
//! - `RUST_LOG`: Log level (default: info)

use eigen_graph_core::infrastructure::telemetry;
use eigen_graph_core::{PriceStreamClient, StreamSettings, stream_symbol_for};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("rustls crypto provider was already installed");
    }

    load_dotenv();
    telemetry::init();

    tracing::info!("Starting live price stream");

    let settings = StreamSettings::from_env()?;
    log_settings(&settings);

    let token_symbol = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("EIGEN_GRAPH_SYMBOL").ok());
    let symbol = stream_symbol_for(token_symbol.as_deref());
    match &symbol {
        Some(symbol) => tracing::info!(%symbol, "Streaming market"),
        None => tracing::warn!("No token selected, stream is unavailable"),
    }

    let client = PriceStreamClient::start(settings, symbol);
    let shutdown_token = CancellationToken::new();

    let mut status_rx = client.subscribe_status();
    let mut points_rx = client.subscribe_points();
    let monitor_token = shutdown_token.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = monitor_token.cancelled() => return,
                changed = status_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let status = *status_rx.borrow_and_update();
                    tracing::info!(%status, "Stream status changed");
                }
                changed = points_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let points = points_rx.borrow_and_update();
                    if let Some(last) = points.last() {
                        tracing::debug!(
                            count = points.len(),
                            price = last.price,
                            "Points updated"
                        );
                    }
                }
            }
        }
    });

    await_shutdown(shutdown_token).await;

    client.shutdown().await;
    tracing::info!("Live price stream stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_settings(settings: &StreamSettings) {
    tracing::info!(
        ws_base = %settings.ws_base,
        max_points = settings.max_points,
        heartbeat_timeout_ms = settings.heartbeat_timeout.as_millis(),
        backoff_base_ms = settings.backoff_base.as_millis(),
        backoff_max_ms = settings.backoff_max.as_millis(),
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
