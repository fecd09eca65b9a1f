//! Access control rule entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::user::UserRole;

/// A coarse grant of permissions over resources to a role or a single user.
///
/// Rules are additive and never deduplicated. They are administered and
/// listed but not evaluated by the role gate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRule {
    /// Unique rule identifier.
    pub id: Uuid,
    /// Role the rule applies to.
    pub role: Option<UserRole>,
    /// Single user the rule applies to.
    pub user_id: Option<Uuid>,
    /// Business domain the rule is scoped to.
    pub domain: Option<String>,
    /// Permitted permissions, e.g. `read`, `write`.
    pub permissions: Vec<String>,
    /// Resources the permissions apply to.
    pub resources: Vec<String>,
    /// Email of the administrator who created the rule.
    pub created_by: String,
    /// When the rule was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create an access rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessRule {
    /// Target role.
    pub role: Option<UserRole>,
    /// Target user.
    pub user_id: Option<Uuid>,
    /// Business domain scope.
    pub domain: Option<String>,
    /// Permissions to grant.
    pub permissions: Vec<String>,
    /// Resources covered.
    pub resources: Vec<String>,
    /// Creating administrator's email.
    pub created_by: String,
}

impl CreateAccessRule {
    /// A rule must name a role or a user.
    pub fn has_subject(&self) -> bool {
        self.role.is_some() || self.user_id.is_some()
    }

    /// Trim entries and drop duplicates within each set, keeping first-seen order.
    pub fn normalized(mut self) -> Self {
        self.permissions = dedup(self.permissions);
        self.resources = dedup(self.resources);
        self
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
