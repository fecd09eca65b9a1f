//! Store traits and the backend bundle.
//!
//! The auth core only sees these traits. Each trait has a PostgreSQL
//! implementation in [`crate::repositories`] and an in-memory one in
//! [`crate::memory`]; both enforce email uniqueness atomically.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use sentinel_core::config::{DatabaseBackend, DatabaseConfig};
use sentinel_core::result::AppResult;
use sentinel_core::types::{PageRequest, PageResponse};
use sentinel_entity::access_rule::{AccessRule, CreateAccessRule};
use sentinel_entity::security_log::{CreateSecurityLogEntry, SecurityLogEntry, SecurityLogFilter};
use sentinel_entity::session::{CreateSession, Session};
use sentinel_entity::user::{CreateUser, UpdateUser, User, UserFilter, UserRole};

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryAccessRuleStore, MemorySecurityLogStore, MemorySessionStore, MemoryUserStore,
};
use crate::migration::run_migrations;
use crate::repositories::{
    AccessRuleRepository, SecurityLogRepository, SessionRepository, UserRepository,
};

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + fmt::Debug {
    /// Insert a user. Fails with `DuplicateEmail` if the email is taken,
    /// including when a concurrent insert wins the race.
    async fn insert(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Apply a partial update. Returns `None` if the user does not exist.
    async fn update_fields(&self, id: Uuid, data: &UpdateUser) -> AppResult<Option<User>>;

    /// Enable or disable an account. Returns `None` if the user does not exist.
    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<Option<User>>;

    /// Record a successful login time.
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Delete a user. Returns `false` if the user did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Total number of users.
    async fn count(&self) -> AppResult<u64>;
}

/// Persistence for the session ledger.
#[async_trait]
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Record a new session.
    async fn insert(&self, data: &CreateSession) -> AppResult<Session>;

    /// Find a session by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Find a session by the digest of its token.
    async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>>;

    /// Mark a session revoked. Returns `false` if it was missing or already revoked.
    async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Revoke every unrevoked session of a user. Returns how many changed.
    async fn revoke_all_for_user(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<u64>;

    /// Unrevoked, unexpired sessions of a user, newest first.
    async fn list_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Vec<Session>>;

    /// Number of unrevoked, unexpired sessions.
    async fn count_active(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Delete sessions that expired before `before`. Returns how many were removed.
    async fn delete_expired(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// Append-only persistence for security events.
#[async_trait]
pub trait SecurityLogStore: Send + Sync + fmt::Debug {
    /// Append an entry.
    async fn append(&self, entry: &CreateSecurityLogEntry) -> AppResult<SecurityLogEntry>;

    /// Most recent entries first, at most `limit`.
    async fn recent(&self, filter: &SecurityLogFilter, limit: u32) -> AppResult<Vec<SecurityLogEntry>>;
}

/// Append-only persistence for access control rules.
#[async_trait]
pub trait AccessRuleStore: Send + Sync + fmt::Debug {
    /// Append a rule.
    async fn insert(&self, data: &CreateAccessRule) -> AppResult<AccessRule>;

    /// Every rule in creation order.
    async fn list(&self) -> AppResult<Vec<AccessRule>>;

    /// Rules targeting `role`, in creation order.
    async fn list_by_role(&self, role: UserRole) -> AppResult<Vec<AccessRule>>;
}

/// Default upper bound for one store call.
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// One backend's stores, built once at startup and shared by every component.
#[derive(Clone)]
pub struct Stores {
    /// User accounts.
    pub users: Arc<dyn UserStore>,
    /// Session ledger.
    pub sessions: Arc<dyn SessionStore>,
    /// Security audit log.
    pub security_log: Arc<dyn SecurityLogStore>,
    /// Access control rules.
    pub access_rules: Arc<dyn AccessRuleStore>,
    /// Upper bound applied by callers to each store operation.
    pub operation_timeout: Duration,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pool = pool.into_pool();
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            security_log: Arc::new(SecurityLogRepository::new(pool.clone())),
            access_rules: Arc::new(AccessRuleRepository::new(pool)),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Process-local stores. Data does not survive a restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            security_log: Arc::new(MemorySecurityLogStore::new()),
            access_rules: Arc::new(MemoryAccessRuleStore::new()),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Override the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Build the configured backend, connecting and migrating when it is PostgreSQL.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        let stores = match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                run_migrations(pool.pool()).await?;
                Self::postgres(pool)
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory stores; data will not persist across restarts");
                Self::in_memory()
            }
        };
        Ok(stores.with_operation_timeout(config.operation_timeout()))
    }
}

impl fmt::Debug for Stores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stores")
            .field("users", &self.users)
            .field("sessions", &self.sessions)
            .field("security_log", &self.security_log)
            .field("access_rules", &self.access_rules)
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}
