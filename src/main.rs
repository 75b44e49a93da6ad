//! Astro Cache - Astrology API server with an in-process response cache

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astro_cache::{create_router, spawn_limiter_sweep_task, AppState, Config};

/// Main entry point for the astrology API server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the response cache and upstream providers
/// 4. Start background rate-limit sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astro_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Astro Cache API server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_enabled={}, max_entries={}, default_ttl={}s, port={}, sweep_interval={}s",
        config.cache_enabled,
        config.cache_max_entries,
        config.cache_default_ttl,
        config.server_port,
        config.rate_limit_sweep_interval
    );
    if config.opencage_api_key.is_none() {
        warn!("OPENCAGE_API_KEY is not set; location search will fail");
    }
    if config.openrouter_api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set; interpretation will fail");
    }

    let state = AppState::from_config(&config).context("failed to build HTTP client")?;
    info!("Response cache initialized");

    let sweep_handle =
        spawn_limiter_sweep_task(state.limiters.clone(), config.rate_limit_sweep_interval);
    info!("Background rate-limit sweep task started");

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
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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
    warn!("Rate-limit sweep task aborted");
}
