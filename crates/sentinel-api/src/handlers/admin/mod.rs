//! Admin handlers. Every route here requires the `admin` role.

pub mod access;
pub mod dashboard;
pub mod logs;
pub mod sessions;
pub mod users;
