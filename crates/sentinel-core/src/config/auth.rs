//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder secret shipped in the defaults; startup warns when it is still in use.
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Longest accepted access token lifetime: one year.
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: u64 = 366 * 24 * 60;

/// HMAC algorithms accepted for token signing.
const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Authentication and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Signing algorithm name (`HS256`, `HS384` or `HS512`).
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Value of the `iss` claim; tokens from another issuer are rejected.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Argon2 cost parameters.
    #[serde(default)]
    pub hashing: HashingConfig,
}

impl AuthConfig {
    /// Reject configurations that would make token issuance unsafe or impossible.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if !SUPPORTED_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "auth.jwt_algorithm must be one of {SUPPORTED_ALGORITHMS:?}, got '{}'",
                self.jwt_algorithm
            )));
        }
        if self.access_token_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_token_ttl_minutes must be greater than zero",
            ));
        }
        if self.access_token_ttl_minutes > MAX_ACCESS_TOKEN_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must not exceed {MAX_ACCESS_TOKEN_TTL_MINUTES}"
            )));
        }
        if self.password_min_length == 0 {
            return Err(AppError::configuration(
                "auth.password_min_length must be greater than zero",
            ));
        }
        self.hashing.validate()?;
        Ok(())
    }

    /// Whether the shipped placeholder secret is still configured.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// The access token lifetime in seconds.
    pub fn access_token_ttl_seconds(&self) -> i64 {
        i64::try_from(self.access_token_ttl_minutes.saturating_mul(60)).unwrap_or(i64::MAX)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_algorithm: default_algorithm(),
            jwt_issuer: default_issuer(),
            access_token_ttl_minutes: default_access_ttl(),
            password_min_length: default_password_min(),
            hashing: HashingConfig::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("password_min_length", &self.password_min_length)
            .field("hashing", &self.hashing)
            .finish()
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl HashingConfig {
    fn validate(&self) -> Result<(), AppError> {
        if self.memory_kib < 8 * self.parallelism.max(1) || self.iterations == 0 || self.parallelism == 0 {
            return Err(AppError::configuration("auth.hashing parameters are out of range"));
        }
        Ok(())
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_issuer() -> String {
    "ecohealth-sentinel".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_password_min() -> usize {
    6
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
