//! Argon2id password hashing and verification.

use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::error;

use sentinel_core::config::HashingConfig;
use sentinel_core::error::AppError;

/// Plaintext hashed once at startup so unknown-email logins cost the same as real ones.
const DUMMY_PASSWORD: &str = "sentinel-timing-equalizer";

/// Handles password hashing and verification using Argon2id.
///
/// Hashing is CPU-bound; async callers should use [`hash_async`](Self::hash_async)
/// and [`verify_async`](Self::verify_async), which run on the blocking pool.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the configured Argon2id cost.
    pub fn new(config: &HashingConfig) -> Result<Self, AppError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let mut hasher = Self {
            argon2,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash(DUMMY_PASSWORD)?);
        Ok(hasher)
    }

    /// Hashes a plaintext password with a fresh random salt into a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a plaintext password against a stored PHC string.
    ///
    /// The comparison is constant time. A malformed stored hash verifies as `false`.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Burns one verification against the dummy hash. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_async(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking pool. A failed task verifies as `false`.
    pub async fn verify_async(&self, password: String, hash: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking pool.
    pub async fn verify_dummy_async(&self, password: String) -> bool {
        let hasher = self.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
        false
    }
}
