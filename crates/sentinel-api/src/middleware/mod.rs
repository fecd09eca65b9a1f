//! HTTP middleware layers and role helpers.

pub mod cors;
pub mod logging;
pub mod rbac;
