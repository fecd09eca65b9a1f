//! Wiring of the auth components over one [`Stores`] bundle.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use sentinel_core::config::{AuthConfig, BootstrapConfig, SessionConfig};
use sentinel_core::result::AppResult;
use sentinel_database::Stores;
use sentinel_entity::security_log::{CreateSecurityLogEntry, LogSeverity, SYSTEM_ACTOR};
use sentinel_entity::user::UserRole;

use crate::access::AccessControl;
use crate::admin::UserAdministration;
use crate::audit::{SecurityAuditLog, actions};
use crate::credentials::CredentialStore;
use crate::guard::AuthorizationGuard;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::session::{SessionCleanup, SessionLedger, SessionManager};

/// Every auth component, built once at startup and cheap to clone.
#[derive(Debug, Clone)]
pub struct AuthCore {
    /// User accounts and credential checks.
    pub credentials: CredentialStore,
    /// Login, registration and logout flows.
    pub sessions: SessionManager,
    /// Server-side session records.
    pub ledger: SessionLedger,
    /// Token to user resolution and the role gate.
    pub guard: AuthorizationGuard,
    /// Security event recorder.
    pub audit: SecurityAuditLog,
    /// Account and session administration.
    pub admin: UserAdministration,
    /// Access rule administration.
    pub access: AccessControl,
    /// Token issuer.
    pub encoder: Arc<JwtEncoder>,
}

impl AuthCore {
    /// Build all components. Fails only on invalid auth configuration.
    pub fn new(config: &AuthConfig, stores: &Stores) -> AppResult<Self> {
        let encoder = Arc::new(JwtEncoder::new(config)?);
        let decoder = Arc::new(JwtDecoder::new(config)?);
        let hasher = PasswordHasher::new(&config.hashing)?;

        let credentials = CredentialStore::new(stores, hasher, PasswordValidator::new(config));
        let ledger = SessionLedger::new(stores);
        let audit = SecurityAuditLog::new(stores);

        Ok(Self {
            sessions: SessionManager::new(
                credentials.clone(),
                Arc::clone(&encoder),
                ledger.clone(),
                audit.clone(),
            ),
            guard: AuthorizationGuard::new(decoder, ledger.clone(), stores),
            admin: UserAdministration::new(credentials.clone(), ledger.clone(), audit.clone()),
            access: AccessControl::new(stores, audit.clone()),
            credentials,
            ledger,
            audit,
            encoder,
        })
    }

    /// Create the configured administrator if the account does not exist yet.
    pub async fn bootstrap_admin(&self, config: &BootstrapConfig) -> AppResult<()> {
        let Some((email, password)) = config.admin_credentials() else {
            return Ok(());
        };

        match self
            .credentials
            .ensure_user(email, password, &config.admin_full_name, UserRole::Admin)
            .await?
        {
            Some(user) => {
                info!(user_id = %user.id, "Bootstrap administrator created");
                self.audit
                    .record(
                        CreateSecurityLogEntry::new(
                            LogSeverity::Info,
                            actions::BOOTSTRAP_ADMIN_CREATED,
                            SYSTEM_ACTOR,
                        )
                        .with_details(json!({ "user_id": user.id, "email": user.email })),
                    )
                    .await;
            }
            None => info!("Bootstrap administrator already present"),
        }
        Ok(())
    }

    /// The background session pruner for this ledger.
    pub fn session_cleanup(&self, config: &SessionConfig) -> SessionCleanup {
        SessionCleanup::new(self.ledger.clone(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use sentinel_core::config::HashingConfig;
    use sentinel_core::error::{ErrorKind, INVALID_CREDENTIALS_MESSAGE, UNAUTHENTICATED_MESSAGE};
    use sentinel_core::types::{PageRequest, PageResponse};
    use sentinel_database::{SessionStore, UserStore};
    use sentinel_entity::security_log::SecurityLogFilter;
    use sentinel_entity::session::{CreateSession, Session};
    use sentinel_entity::user::{CreateUser, UpdateUser, User, UserFilter};

    use crate::context::RequestMeta;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "core-test-secret".into(),
            hashing: HashingConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
            ..AuthConfig::default()
        }
    }

    fn core() -> (AuthCore, Stores) {
        let stores = Stores::in_memory();
        (AuthCore::new(&auth_config(), &stores).unwrap(), stores)
    }

    fn meta() -> RequestMeta {
        RequestMeta::new(Some("203.0.113.9".into()), Some("tests".into()))
    }

    #[tokio::test]
    async fn test_register_then_login_resolves_email() {
        let (core, _) = core();
        core.sessions
            .register("alice@example.com", "secret123", "Alice", UserRole::User, &meta())
            .await
            .unwrap();
        let grant = core
            .sessions
            .login("alice@example.com", "secret123", &meta())
            .await
            .unwrap();

        let ctx = core.guard.authenticate(&grant.access_token).await.unwrap();
        assert_eq!(ctx.email(), "alice@example.com");
        assert_eq!(ctx.session_id, grant.session_id);
        assert!(ctx.user.is_active);
    }

    #[tokio::test]
    async fn test_login_failures_share_kind_and_message() {
        let (core, _) = core();
        core.sessions
            .register("alice@example.com", "secret123", "Alice", UserRole::User, &meta())
            .await
            .unwrap();

        let wrong = core
            .sessions
            .login("alice@example.com", "secret999", &meta())
            .await
            .unwrap_err();
        let unknown = core
            .sessions
            .login("ghost@example.com", "secret123", &meta())
            .await
            .unwrap_err();
        assert_eq!(wrong.kind, ErrorKind::InvalidCredentials);
        assert_eq!(unknown.kind, ErrorKind::InvalidCredentials);
        assert_eq!(wrong.message, INVALID_CREDENTIALS_MESSAGE);
        assert_eq!(unknown.message, INVALID_CREDENTIALS_MESSAGE);

        let failed = core
            .audit
            .recent(
                &SecurityLogFilter {
                    actor: Some("ghost@example.com".into()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].action, actions::LOGIN_FAILED);
    }

    #[tokio::test]
    async fn test_logout_revokes_before_expiry() {
        let (core, _) = core();
        let grant = core
            .sessions
            .register("bob@example.com", "secret123", "Bob", UserRole::Doctor, &meta())
            .await
            .unwrap();
        let ctx = core.guard.authenticate(&grant.access_token).await.unwrap();

        core.sessions.logout(&ctx, &meta()).await.unwrap();
        let err = core.guard.authenticate(&grant.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, UNAUTHENTICATED_MESSAGE);
    }

    #[tokio::test]
    async fn test_deactivation_blocks_login_and_existing_tokens() {
        let (core, _) = core();
        let grant = core
            .sessions
            .register("carol@example.com", "secret123", "Carol", UserRole::Farmer, &meta())
            .await
            .unwrap();
        core.credentials
            .set_active(grant.user.id, false)
            .await
            .unwrap();

        let login = core
            .sessions
            .login("carol@example.com", "secret123", &meta())
            .await
            .unwrap_err();
        assert_eq!(login.kind, ErrorKind::AccountDeactivated);

        // The token itself still verifies; the guard refuses it.
        let decoder = JwtDecoder::new(&auth_config()).unwrap();
        assert!(decoder.verify(&grant.access_token).is_ok());
        let err = core.guard.authenticate(&grant.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_role_gate() {
        let (core, _) = core();
        let user = core
            .sessions
            .register("dave@example.com", "secret123", "Dave", UserRole::User, &meta())
            .await
            .unwrap();
        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();

        let denied = core
            .guard
            .authorize(&user.access_token, UserRole::Admin)
            .await
            .unwrap_err();
        assert_eq!(denied.kind, ErrorKind::Forbidden);

        let profile = core
            .guard
            .authorize(&admin.access_token, UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(profile.email, "root@example.com");
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let (core, _) = core();
        core.sessions
            .register("alice@example.com", "secret123", "Alice", UserRole::User, &meta())
            .await
            .unwrap();
        let token = core
            .sessions
            .login("alice@example.com", "secret123", &meta())
            .await
            .unwrap()
            .access_token;

        let me = core.guard.authenticate(&token).await.unwrap().profile();
        let json = serde_json::to_value(&me).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());

        let err = core.guard.authorize(&token, UserRole::Admin).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_deleted_user_token_is_unauthenticated() {
        let (core, _) = core();
        let grant = core
            .sessions
            .register("temp@example.com", "secret123", "Temp", UserRole::User, &meta())
            .await
            .unwrap();
        core.credentials.delete(grant.user.id).await.unwrap();
        let err = core.guard.authenticate(&grant.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
    }

    #[tokio::test]
    async fn test_admin_deactivation_revokes_sessions() {
        let (core, _) = core();
        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();
        let admin_ctx = core.guard.authenticate(&admin.access_token).await.unwrap();
        let target = core
            .sessions
            .register("frank@example.com", "secret123", "Frank", UserRole::User, &meta())
            .await
            .unwrap();

        core.admin
            .set_active(&admin_ctx, target.user.id, false, &meta())
            .await
            .unwrap();
        assert!(core.admin.user_sessions(target.user.id).await.unwrap().is_empty());

        // Reactivation does not resurrect revoked sessions.
        core.admin
            .set_active(&admin_ctx, target.user.id, true, &meta())
            .await
            .unwrap();
        assert!(core.guard.authenticate(&target.access_token).await.is_err());

        let stats = core.admin.dashboard().await.unwrap();
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.active_sessions, 1);
        assert!(stats.recent_activity.len() <= 10);
        assert_eq!(stats.recent_activity[0].action, actions::USER_ACTIVATED);
    }

    #[tokio::test]
    async fn test_admin_update_and_delete() {
        let (core, _) = core();
        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();
        let admin_ctx = core.guard.authenticate(&admin.access_token).await.unwrap();
        let target = core
            .sessions
            .register("gina@example.com", "secret123", "Gina", UserRole::User, &meta())
            .await
            .unwrap();

        let updated = core
            .admin
            .update_user(
                &admin_ctx,
                target.user.id,
                UpdateUser {
                    role: Some(UserRole::Doctor),
                    ..Default::default()
                },
                &meta(),
            )
            .await
            .unwrap();
        assert_eq!(updated.role, UserRole::Doctor);

        let taken = core
            .admin
            .update_user(
                &admin_ctx,
                target.user.id,
                UpdateUser {
                    email: Some("ROOT@example.com".into()),
                    ..Default::default()
                },
                &meta(),
            )
            .await
            .unwrap_err();
        assert_eq!(taken.kind, ErrorKind::DuplicateEmail);

        core.admin
            .delete_user(&admin_ctx, target.user.id, &meta())
            .await
            .unwrap();
        let again = core
            .admin
            .delete_user(&admin_ctx, target.user.id, &meta())
            .await
            .unwrap_err();
        assert_eq!(again.kind, ErrorKind::NotFound);
        assert!(core.guard.authenticate(&target.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_once() {
        let (core, _) = core();
        let config = BootstrapConfig {
            admin_email: Some("Admin@EcoHealth.dev".into()),
            admin_password: Some("bootstrap-pass".into()),
            admin_full_name: "Admin".into(),
        };
        core.bootstrap_admin(&config).await.unwrap();
        core.bootstrap_admin(&config).await.unwrap();

        assert_eq!(core.credentials.count().await.unwrap(), 1);
        let admin = core
            .credentials
            .find_by_email("admin@ecohealth.dev")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_password_reset_request_audits_known_email_only() {
        let (core, _) = core();
        core.sessions
            .register("hana@example.com", "secret123", "Hana", UserRole::User, &meta())
            .await
            .unwrap();
        core.sessions
            .request_password_reset("hana@example.com", &meta())
            .await
            .unwrap();
        core.sessions
            .request_password_reset("nobody@example.com", &meta())
            .await
            .unwrap();

        let entries = core
            .audit
            .recent(&SecurityLogFilter::default(), None)
            .await
            .unwrap();
        let resets = entries
            .iter()
            .filter(|e| e.action == actions::PASSWORD_RESET_REQUEST)
            .count();
        assert_eq!(resets, 1);
    }

    #[tokio::test]
    async fn test_access_rules_creation_order() {
        let (core, _) = core();
        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();
        let ctx = core.guard.authenticate(&admin.access_token).await.unwrap();

        for resource in ["patients", "crops", "patients"] {
            core.access
                .create_rule(
                    &ctx,
                    sentinel_entity::access_rule::CreateAccessRule {
                        role: Some(UserRole::Doctor),
                        user_id: None,
                        domain: None,
                        permissions: vec!["read".into()],
                        resources: vec![resource.into()],
                        created_by: String::new(),
                    },
                    &meta(),
                )
                .await
                .unwrap();
        }

        let rules = core.access.list_rules().await.unwrap();
        let resources: Vec<_> = rules.iter().map(|r| r.resources[0].as_str()).collect();
        assert_eq!(resources, vec!["patients", "crops", "patients"]);
        assert!(rules.iter().all(|r| r.created_by == "root@example.com"));
        assert_eq!(core.access.rules_for_role(UserRole::Doctor).await.unwrap().len(), 3);
        assert!(core.access.rules_for_role(UserRole::Farmer).await.unwrap().is_empty());
    }

    #[derive(Debug)]
    struct StalledUsers;

    #[async_trait]
    impl UserStore for StalledUsers {
        async fn insert(&self, _data: &CreateUser) -> AppResult<User> {
            std::future::pending().await
        }
        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn find_by_email(&self, _email: &str) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn list(&self, _filter: &UserFilter, _page: &PageRequest) -> AppResult<PageResponse<User>> {
            std::future::pending().await
        }
        async fn update_fields(&self, _id: Uuid, _data: &UpdateUser) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn set_active(&self, _id: Uuid, _active: bool) -> AppResult<Option<User>> {
            std::future::pending().await
        }
        async fn touch_last_login(&self, _id: Uuid, _at: DateTime<Utc>) -> AppResult<()> {
            std::future::pending().await
        }
        async fn delete(&self, _id: Uuid) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn count(&self) -> AppResult<u64> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_store_is_transient() {
        let mut stores = Stores::in_memory().with_operation_timeout(Duration::from_millis(500));
        stores.users = Arc::new(StalledUsers);
        let core = AuthCore::new(&auth_config(), &stores).unwrap();

        let err = core
            .sessions
            .login("alice@example.com", "secret123", &meta())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transient);

        let entries = core
            .audit
            .recent(&SecurityLogFilter::default(), None)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[derive(Debug, Default)]
    struct RevokeFailsSessions {
        inner: sentinel_database::memory::MemorySessionStore,
    }

    #[async_trait]
    impl SessionStore for RevokeFailsSessions {
        async fn insert(&self, data: &CreateSession) -> AppResult<Session> {
            self.inner.insert(data).await
        }
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
            self.inner.find_by_id(id).await
        }
        async fn find_by_token_hash(&self, token_hash: &str) -> AppResult<Option<Session>> {
            self.inner.find_by_token_hash(token_hash).await
        }
        async fn revoke(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
            self.inner.revoke(id, at).await
        }
        async fn revoke_all_for_user(&self, _user_id: Uuid, _at: DateTime<Utc>) -> AppResult<u64> {
            Err(sentinel_core::AppError::database("connection reset"))
        }
        async fn list_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Vec<Session>> {
            self.inner.list_active_for_user(user_id, now).await
        }
        async fn count_active(&self, now: DateTime<Utc>) -> AppResult<u64> {
            self.inner.count_active(now).await
        }
        async fn delete_expired(&self, before: DateTime<Utc>) -> AppResult<u64> {
            self.inner.delete_expired(before).await
        }
    }

    #[tokio::test]
    async fn test_failed_revocation_does_not_fail_committed_admin_change() {
        let mut stores = Stores::in_memory();
        stores.sessions = Arc::new(RevokeFailsSessions::default());
        let core = AuthCore::new(&auth_config(), &stores).unwrap();

        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();
        let admin_ctx = core.guard.authenticate(&admin.access_token).await.unwrap();
        let target = core
            .sessions
            .register("ivy@example.com", "secret123", "Ivy", UserRole::User, &meta())
            .await
            .unwrap();

        let profile = core
            .admin
            .set_active(&admin_ctx, target.user.id, false, &meta())
            .await
            .unwrap();
        assert!(!profile.is_active);
        // The session row survived, but the guard still refuses the account.
        let err = core.guard.authenticate(&target.access_token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);

        core.admin
            .delete_user(&admin_ctx, target.user.id, &meta())
            .await
            .unwrap();
        assert!(core.credentials.find_by_id(target.user.id).await.unwrap().is_none());
        assert!(core.guard.authenticate(&target.access_token).await.is_err());
    }

    #[tokio::test]
    async fn test_dashboard_counts_users_sessions_and_activity() {
        let (core, _) = core();
        let admin = core
            .sessions
            .register("root@example.com", "secret123", "Root", UserRole::Admin, &meta())
            .await
            .unwrap();
        core.sessions
            .login("root@example.com", "secret123", &meta())
            .await
            .unwrap();
        assert!(core.guard.authenticate(&admin.access_token).await.is_ok());

        let stats = core.admin.dashboard().await.unwrap();
        assert_eq!(stats.total_users, 1);
        assert_eq!(stats.active_sessions, 2);
        let recent: Vec<_> = stats.recent_activity.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(recent, vec![actions::LOGIN, actions::REGISTER]);
    }
}
