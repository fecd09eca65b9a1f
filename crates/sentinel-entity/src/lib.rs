//! # sentinel-entity
//!
//! Domain entity models for EcoHealth Sentinel. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! additionally derive `sqlx::FromRow`.

pub mod access_rule;
pub mod security_log;
pub mod session;
pub mod user;
