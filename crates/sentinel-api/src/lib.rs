//! # sentinel-api
//!
//! HTTP API layer for EcoHealth Sentinel built on Axum.
//!
//! Provides the auth and admin REST endpoints, middleware (CORS, request
//! logging, timeouts), extractors, DTOs, and the mapping from [`AppError`]
//! to HTTP responses.
//!
//! [`AppError`]: sentinel_core::AppError

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
