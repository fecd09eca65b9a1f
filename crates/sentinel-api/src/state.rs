//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sentinel_auth::AuthCore;
use sentinel_core::config::AppConfig;
use sentinel_core::result::AppResult;
use sentinel_database::Stores;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Cloning is cheap:
/// the config is behind an `Arc` and every store and auth component holds
/// `Arc` handles internally.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Backing stores, acquired once at startup
    pub stores: Stores,
    /// Credential, session, guard, audit and admin components
    pub auth: AuthCore,
}

impl AppState {
    /// Wire the auth core over `stores`.
    pub fn new(config: AppConfig, stores: Stores) -> AppResult<Self> {
        let auth = AuthCore::new(&config.auth, &stores)?;
        Ok(Self {
            config: Arc::new(config),
            stores,
            auth,
        })
    }
}
