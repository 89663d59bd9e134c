//! Main entry point for the venue admin server

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use venue_api::build_router;
use venue_core::{Config, context_error, context_error::Result, init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let config = Config::load().map_err(|e| context_error!("Failed to load configuration: {}", e))?;
    init_logging(&config.logging)?;

    info!(
        "Starting venue admin server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_address()
    );
    info!(backend = %config.backend.url, endpoints = %config.endpoints.base_url, "Upstream services");
    if config.backend.service_key.is_none() {
        warn!("No backend service key configured; writes run with the anon key");
    }

    let app = build_router(config.clone()).inspect_err(|e| error!("Failed to build router: {}", e))?;

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| context_error!("Failed to bind to {}: {}", addr, e))?;

    info!("Admin API:  http://{}/admin", addr);
    info!("Health:     http://{}/health", addr);

    // Start the server with graceful shutdown
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| context_error!("Server error: {}", e))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
