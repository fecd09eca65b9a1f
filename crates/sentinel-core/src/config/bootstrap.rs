//! Startup account provisioning.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Optional administrator account created at startup when absent.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Email of the administrator account.
    #[serde(default)]
    pub admin_email: Option<String>,
    /// Initial password for the administrator account.
    #[serde(default)]
    pub admin_password: Option<String>,
    /// Display name for the administrator account.
    #[serde(default = "default_full_name")]
    pub admin_full_name: String,
}

impl BootstrapConfig {
    /// Email and password must be configured together.
    pub fn validate(&self) -> Result<(), AppError> {
        match (&self.admin_email, &self.admin_password) {
            (Some(_), None) | (None, Some(_)) => Err(AppError::configuration(
                "bootstrap.admin_email and bootstrap.admin_password must be set together",
            )),
            _ => Ok(()),
        }
    }

    /// The configured `(email, password)` pair, if any.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[REDACTED]"))
            .field("admin_full_name", &self.admin_full_name)
            .finish()
    }
}

fn default_full_name() -> String {
    "System Administrator".to_string()
}
