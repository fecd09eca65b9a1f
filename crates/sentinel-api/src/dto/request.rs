//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use sentinel_entity::access_rule::CreateAccessRule;
use sentinel_entity::security_log::{LogSeverity, SecurityLogFilter};
use sentinel_entity::user::{UpdateUser, UserFilter, UserRole};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password; the length policy is enforced by the credential store.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    /// Requested role.
    #[serde(default)]
    pub role: UserRole,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password reset request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Account email.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Admin edit of a user. Absent fields stay unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// New display name.
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            email: req.email,
            full_name: req.full_name,
            role: req.role,
        }
    }
}

/// Activate or deactivate an account.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetActiveRequest {
    /// Target state.
    pub is_active: bool,
}

/// New access control rule.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccessRuleRequest {
    /// Role the rule targets.
    pub role: Option<UserRole>,
    /// Single user the rule targets.
    pub user_id: Option<Uuid>,
    /// Optional domain scope.
    pub domain: Option<String>,
    /// Granted permissions.
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permissions: Vec<String>,
    /// Resources the permissions apply to.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl From<CreateAccessRuleRequest> for CreateAccessRule {
    fn from(req: CreateAccessRuleRequest) -> Self {
        Self {
            role: req.role,
            user_id: req.user_id,
            domain: req.domain,
            permissions: req.permissions,
            resources: req.resources,
            created_by: String::new(),
        }
    }
}

/// Query string of `GET /api/admin/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Only active or only inactive users.
    pub is_active: Option<bool>,
    /// Substring of email or full name.
    pub search: Option<String>,
}

impl From<UserListQuery> for UserFilter {
    fn from(q: UserListQuery) -> Self {
        Self {
            role: q.role,
            is_active: q.is_active,
            search: q.search,
        }
    }
}

/// Query string of `GET /api/admin/logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQuery {
    /// Severity filter.
    #[serde(rename = "type")]
    pub severity: Option<LogSeverity>,
    /// Actor filter.
    pub actor: Option<String>,
    /// Maximum entries.
    pub limit: Option<u32>,
}

impl LogQuery {
    /// The filter part of the query.
    pub fn filter(&self) -> SecurityLogFilter {
        SecurityLogFilter {
            severity: self.severity,
            actor: self.actor.clone(),
        }
    }
}

/// Query string of `GET /api/admin/access-control`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessRuleQuery {
    /// Only rules for this role.
    pub role: Option<UserRole>,
}
