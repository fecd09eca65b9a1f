//! # sentinel-auth
//!
//! The credential and access control core of EcoHealth Sentinel.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing and the password policy
//! - `jwt`: signed, time-bounded bearer tokens
//! - `credentials`: user accounts and credential checks
//! - `session`: the session ledger, login/registration/logout flows, pruning
//! - `guard`: bearer token resolution and the role gate
//! - `audit`: best-effort security event log
//! - `admin`: account and session administration
//! - `access`: access control rule administration
//! - `service`: wiring of all of the above over one store bundle

pub mod access;
pub mod admin;
pub mod audit;
pub mod context;
pub mod credentials;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod service;
pub mod session;

pub use access::AccessControl;
pub use admin::{DashboardStats, UserAdministration};
pub use audit::SecurityAuditLog;
pub use context::{AuthContext, RequestMeta};
pub use credentials::CredentialStore;
pub use guard::AuthorizationGuard;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use service::AuthCore;
pub use session::{AuthGrant, SessionCleanup, SessionLedger, SessionManager};
