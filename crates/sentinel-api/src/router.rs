//! Route definitions for the Sentinel HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with all routes.
///
/// Cross-cutting layers are added by [`crate::app::build_app`].
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Auth endpoints: register, login, me, logout, forgot-password
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
}

/// Admin endpoints
fn admin_routes() -> Router<AppState> {
    use handlers::admin::{access, dashboard, logs, sessions, users};

    Router::new()
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/users", get(users::list_users))
        .route(
            "/admin/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/admin/users/{id}/status", put(users::set_status))
        .route("/admin/users/{id}/sessions", get(users::user_sessions))
        .route("/admin/sessions/{id}/revoke", post(sessions::revoke_session))
        .route("/admin/logs", get(logs::list_logs))
        .route(
            "/admin/access-control",
            get(access::list_rules).post(access::create_rule),
        )
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
