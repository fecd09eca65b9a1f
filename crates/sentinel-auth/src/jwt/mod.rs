//! Signed, time-bounded bearer tokens.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::{JwtDecoder, TokenRejection};
pub use encoder::{IssuedToken, JwtEncoder};

use jsonwebtoken::Algorithm;

use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;

/// Resolve the configured HMAC algorithm. Asymmetric algorithms are refused.
pub(crate) fn signing_algorithm(config: &AuthConfig) -> Result<Algorithm, AppError> {
    match config.jwt_algorithm.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::configuration(format!(
            "Unsupported token algorithm '{other}'; expected HS256, HS384 or HS512"
        ))),
    }
}
