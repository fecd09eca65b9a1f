//! Security audit log entities.

pub mod model;

pub use model::{CreateSecurityLogEntry, LogSeverity, SecurityLogEntry, SecurityLogFilter, SYSTEM_ACTOR};
