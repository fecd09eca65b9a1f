//! Credential store: user accounts, password hashes, and credential checks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use sentinel_core::AppError;
use sentinel_core::error::ErrorKind;
use sentinel_core::result::AppResult;
use sentinel_core::types::{PageRequest, PageResponse};
use sentinel_database::{Stores, UserStore, bounded};
use sentinel_entity::user::{CreateUser, UpdateUser, User, UserFilter, UserRole};

use crate::password::{PasswordHasher, PasswordValidator};

/// Lowercase and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require_email(email: &str) -> AppResult<String> {
    let email = normalize_email(email);
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::validation("Invalid email address")),
    }
}

fn require_full_name(full_name: &str) -> AppResult<String> {
    let full_name = full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::validation("Full name must not be empty"));
    }
    Ok(full_name.to_string())
}

/// Owns user records and everything that touches password hashes.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    timeout: Duration,
}

impl CredentialStore {
    /// Creates a credential store over the configured user store.
    pub fn new(stores: &Stores, hasher: PasswordHasher, validator: PasswordValidator) -> Self {
        Self {
            users: Arc::clone(&stores.users),
            hasher,
            validator,
            timeout: stores.operation_timeout,
        }
    }

    /// Create an account. Fails with `DuplicateEmail` if the email is taken.
    ///
    /// The lookup beforehand only saves a hash on the common path; the
    /// store's unique insert decides races between concurrent registrations.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: UserRole,
    ) -> AppResult<User> {
        let email = require_email(email)?;
        let full_name = require_full_name(full_name)?;
        self.validator.validate(password)?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::duplicate_email());
        }

        let password_hash = self.hasher.hash_async(password.to_string()).await?;
        let data = CreateUser {
            email,
            password_hash,
            full_name,
            role,
        };
        let user = bounded(self.timeout, "users.insert", self.users.insert(&data)).await?;
        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        bounded(self.timeout, "users.find_by_email", self.users.find_by_email(&email)).await
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        bounded(self.timeout, "users.find_by_id", self.users.find_by_id(id)).await
    }

    /// Check an email and password pair.
    ///
    /// Unknown email and wrong password fail identically, and an unknown
    /// email still pays for one hash verification. The active flag is only
    /// consulted after the password matched.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.find_by_email(email).await? else {
            self.hasher.verify_dummy_async(password.to_string()).await;
            debug!("Login attempt for unknown email");
            return Err(AppError::invalid_credentials());
        };

        let valid = self
            .hasher
            .verify_async(password.to_string(), user.password_hash.clone())
            .await;
        if !valid {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AppError::invalid_credentials());
        }
        if !user.is_active {
            debug!(user_id = %user.id, "Login attempt on deactivated account");
            return Err(AppError::account_deactivated());
        }
        Ok(user)
    }

    /// List users, newest first.
    pub async fn list(&self, filter: &UserFilter, page: &PageRequest) -> AppResult<PageResponse<User>> {
        bounded(self.timeout, "users.list", self.users.list(filter, page)).await
    }

    /// Enable or disable an account.
    pub async fn set_active(&self, id: Uuid, active: bool) -> AppResult<User> {
        bounded(self.timeout, "users.set_active", self.users.set_active(id, active))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Apply a partial update. At least one field must be present.
    pub async fn update_fields(&self, id: Uuid, mut data: UpdateUser) -> AppResult<User> {
        if data.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }
        if let Some(email) = data.email.as_deref() {
            data.email = Some(require_email(email)?);
        }
        if let Some(full_name) = data.full_name.as_deref() {
            data.full_name = Some(require_full_name(full_name)?);
        }
        bounded(self.timeout, "users.update_fields", self.users.update_fields(id, &data))
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Delete an account. Fails with `NotFound` if absent.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if bounded(self.timeout, "users.delete", self.users.delete(id)).await? {
            Ok(())
        } else {
            Err(AppError::not_found("User not found"))
        }
    }

    /// Record a successful login. Best-effort.
    pub async fn touch_last_login(&self, id: Uuid) {
        if let Err(e) = bounded(
            self.timeout,
            "users.touch_last_login",
            self.users.touch_last_login(id, Utc::now()),
        )
        .await
        {
            warn!(user_id = %id, error = %e, "Failed to record last login");
        }
    }

    /// Total number of users.
    pub async fn count(&self) -> AppResult<u64> {
        bounded(self.timeout, "users.count", self.users.count()).await
    }

    /// Create the account unless one already exists. Returns the new user,
    /// or `None` if the email was already registered.
    pub async fn ensure_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: UserRole,
    ) -> AppResult<Option<User>> {
        match self.register(email, password, full_name, role).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is(ErrorKind::DuplicateEmail) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
