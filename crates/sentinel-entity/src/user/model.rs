//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered account.
///
/// The password hash never leaves the server: it is skipped on
/// serialization and excluded from [`UserProfile`].
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email, stored lowercased and unique.
    pub email: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Role used by the role gate.
    pub role: UserRole,
    /// Disabled accounts cannot log in and their tokens stop authenticating.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last modified.
    pub updated_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// The public projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("last_login_at", &self.last_login_at)
            .finish_non_exhaustive()
    }
}

/// Public projection of a [`User`], safe to return to any caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// Data required to create a new user.
#[derive(Clone)]
pub struct CreateUser {
    /// Normalized email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role.
    pub role: UserRole,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Partial update of an existing user. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

impl UpdateUser {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.full_name.is_none() && self.role.is_none()
    }
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Only active or only inactive users.
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on email or full name.
    pub search: Option<String>,
}

impl UserFilter {
    /// Whether `user` passes every set filter.
    pub fn matches(&self, user: &User) -> bool {
        if self.role.is_some_and(|role| role != user.role) {
            return false;
        }
        if self.is_active.is_some_and(|active| active != user.is_active) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                user.email.to_lowercase().contains(&term)
                    || user.full_name.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
