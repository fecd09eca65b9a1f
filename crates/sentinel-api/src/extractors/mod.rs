//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod pagination;

pub use auth::{AdminUser, AuthUser, bearer_token};
pub use client::ClientMeta;
pub use json::ValidatedJson;
pub use pagination::PaginationParams;
