//! Application builder: wires router, middleware and state into an Axum app,
//! and runs it until a shutdown signal arrives.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::middleware as axum_middleware;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sentinel_core::config::AppConfig;
use sentinel_core::error::AppError;
use sentinel_database::Stores;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);

    build_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

/// Runs the Sentinel server over already-built stores.
///
/// Provisions the bootstrap administrator, starts the session pruner, and
/// serves until Ctrl+C or SIGTERM. The pruner is stopped through the same
/// shutdown channel and given `shutdown_grace_seconds` to finish.
pub async fn run_server(config: AppConfig, stores: Stores) -> Result<(), AppError> {
    info!("Starting EcoHealth Sentinel v{}", env!("CARGO_PKG_VERSION"));

    let bootstrap = config.bootstrap.clone();
    let session_config = config.session.clone();
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, stores)?;
    state.auth.bootstrap_admin(&bootstrap).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_handle = if session_config.cleanup_enabled {
        Some(state.auth.session_cleanup(&session_config).spawn(shutdown_rx))
    } else {
        info!("Session cleanup disabled");
        None
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(address = %addr, "Sentinel server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = cleanup_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            warn!("Session cleanup did not stop within the grace period");
        }
    }

    info!("Sentinel server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
