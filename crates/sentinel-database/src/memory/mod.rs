//! In-memory implementations of the store traits.
//!
//! Each store keeps its table behind a Tokio `RwLock`. A write that must
//! check and mutate (such as a unique insert) does both under one write
//! guard, which gives the same atomicity as a database constraint.

pub mod access_rule;
pub mod security_log;
pub mod session;
pub mod user;

pub use access_rule::MemoryAccessRuleStore;
pub use security_log::MemorySecurityLogStore;
pub use session::MemorySessionStore;
pub use user::MemoryUserStore;
