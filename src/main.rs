//! EcoHealth Sentinel server: credential and access control core.
//!
//! Main entry point that loads configuration, builds the stores, and starts
//! the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use sentinel_core::config::{AppConfig, LogFormat};
use sentinel_core::error::AppError;
use sentinel_database::Stores;

#[tokio::main]
async fn main() {
    let env = std::env::var("SENTINEL_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, backend = ?config.database.backend, "Configuration loaded");
    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set SENTINEL_AUTH__JWT_SECRET");
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Build the stores and hand over to the API server.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Connecting to backing store...");
    let stores = Stores::from_config(&config.database).await?;
    tracing::info!("Backing store ready");

    sentinel_api::run_server(config, stores).await
}
