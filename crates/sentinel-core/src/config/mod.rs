//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a default so an empty file is a valid config.

pub mod app;
pub mod auth;
pub mod bootstrap;
pub mod database;
pub mod logging;
pub mod session;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, HashingConfig};
pub use self::bootstrap::BootstrapConfig;
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides, e.g. `SENTINEL_AUTH__JWT_SECRET`.
const ENV_PREFIX: &str = "SENTINEL";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Backing store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token, password, and hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session ledger maintenance settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Startup account provisioning.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Layers `config/default.toml`, then `config/{env}.toml`, then
    /// environment variables prefixed with `SENTINEL_`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file, without env overlays.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.database.validate()?;
        self.bootstrap.validate()?;
        Ok(())
    }
}
