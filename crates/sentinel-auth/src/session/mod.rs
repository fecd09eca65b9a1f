//! Session lifecycle: the ledger of issued tokens, the login, registration
//! and logout flows, and periodic pruning.

pub mod cleanup;
pub mod ledger;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use ledger::{SessionLedger, token_digest};
pub use manager::{AuthGrant, SessionManager};
