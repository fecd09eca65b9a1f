//! Access control rule entities.

pub mod model;

pub use model::{AccessRule, CreateAccessRule};
