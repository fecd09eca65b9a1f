//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles known to the role gate.
///
/// Roles are compared by equality only; there is no privilege ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator.
    Admin,
    /// General account.
    #[default]
    User,
    /// Healthcare domain account.
    Doctor,
    /// Agriculture domain account.
    Farmer,
}

impl UserRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Doctor => "doctor",
            Self::Farmer => "farmer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = sentinel_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "doctor" => Ok(Self::Doctor),
            "farmer" => Ok(Self::Farmer),
            _ => Err(sentinel_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, user, doctor, farmer"
            ))),
        }
    }
}
