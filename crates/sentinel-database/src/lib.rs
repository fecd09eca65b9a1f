//! # sentinel-database
//!
//! Persistence for EcoHealth Sentinel: the store traits the auth core is
//! written against, their PostgreSQL implementations, process-local
//! in-memory implementations, and the [`Stores`] bundle that wires one
//! backend into the rest of the application.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod timeout;

pub use connection::DatabasePool;
pub use store::{AccessRuleStore, SecurityLogStore, SessionStore, Stores, UserStore};
pub use timeout::bounded;
