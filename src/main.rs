//! PRO Directory - pet-care professional listing service
//!
//! Binary entry point: loads configuration, seeds the store and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pro_directory::api::create_router;
use pro_directory::pros::import_pros;
use pro_directory::{spawn_sweep_task, AppState, Config, MemoryStore};

/// Main entry point for the PRO directory server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the document store, loading the seed file when configured
/// 4. Start background cache sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pro_directory=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PRO Directory server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, listing_ttl={}s, sweep_interval={}s, max_radius={}km",
        config.server_port, config.listing_ttl, config.sweep_interval, config.max_radius_km
    );

    let store = MemoryStore::new();
    if let Some(path) = &config.pros_seed_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read seed file {}", path))?;
        let documents = serde_json::from_str(&raw)
            .with_context(|| format!("seed file {} is not valid JSON", path))?;
        let loaded = import_pros(&store, documents)
            .await
            .with_context(|| format!("failed to load seed file {}", path))?;
        info!("Loaded {} PROs from {}", loaded, path);
    }

    let state = AppState::from_config(&config, Arc::new(store));

    let sweep_handle = spawn_sweep_task(state.cache.clone(), config.sweep_interval);
    info!("Background sweep task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
