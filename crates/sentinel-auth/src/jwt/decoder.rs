//! JWT token verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;

use super::claims::Claims;
use super::signing_algorithm;

/// Why a token was refused. Only ever logged; callers see
/// [`AppError::unauthenticated`] whatever the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    /// Signature valid, `exp` reached.
    Expired,
    /// Signature does not match the payload.
    BadSignature,
    /// Signed by a different issuer.
    WrongIssuer,
    /// Not a well-formed token.
    Malformed,
}

impl TokenRejection {
    /// Short label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::BadSignature => "bad_signature",
            Self::WrongIssuer => "wrong_issuer",
            Self::Malformed => "malformed",
        }
    }
}

/// Verifies access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let mut validation = Validation::new(signing_algorithm(config)?);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.jwt_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Decode a token, reporting the precise rejection reason.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenRejection> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenRejection::Expired,
                JwtErrorKind::InvalidSignature => TokenRejection::BadSignature,
                JwtErrorKind::InvalidIssuer => TokenRejection::WrongIssuer,
                _ => TokenRejection::Malformed,
            }
        })?;

        // The library accepts `exp == now`; a token is dead from its `exp` second.
        if data.claims.is_expired_at(Utc::now()) {
            return Err(TokenRejection::Expired);
        }
        Ok(data.claims)
    }

    /// Verify signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_claims(token).map_err(|reason| {
            debug!(reason = reason.as_str(), "Token rejected");
            AppError::unauthenticated()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::Duration;
    use sentinel_core::error::{ErrorKind, UNAUTHENTICATED_MESSAGE};
    use uuid::Uuid;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-signing-secret".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_issue_then_verify_resolves_subject() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config).unwrap();
        let sid = Uuid::new_v4();

        let issued = encoder.issue_default("alice@example.com", sid).unwrap();
        let claims = decoder.verify(&issued.token).unwrap();
        assert_eq!(claims.subject(), "alice@example.com");
        assert_eq!(claims.session_id(), sid);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_zero_ttl_is_rejected_as_expired() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config).unwrap();

        let issued = encoder
            .issue("alice@example.com", Uuid::new_v4(), Duration::zero())
            .unwrap();
        assert_eq!(decoder.decode_claims(&issued.token), Err(TokenRejection::Expired));

        let err = decoder.verify(&issued.token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, UNAUTHENTICATED_MESSAGE);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let config = config();
        let encoder = JwtEncoder::new(&config).unwrap();
        let decoder = JwtDecoder::new(&config).unwrap();
        let token = encoder.issue_default("alice@example.com", Uuid::new_v4()).unwrap().token;

        let mut bytes = token.into_bytes();
        let idx = bytes.len() - 3;
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        let err = decoder.verify(&tampered).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthenticated);
        assert_eq!(err.message, UNAUTHENTICATED_MESSAGE);
    }

    #[test]
    fn test_foreign_secret_and_garbage() {
        let encoder = JwtEncoder::new(&config()).unwrap();
        let other = JwtDecoder::new(&AuthConfig {
            jwt_secret: "a-different-secret".into(),
            ..AuthConfig::default()
        })
        .unwrap();
        let token = encoder.issue_default("alice@example.com", Uuid::new_v4()).unwrap().token;

        assert_eq!(other.decode_claims(&token), Err(TokenRejection::BadSignature));
        assert_eq!(other.decode_claims("not.a.token"), Err(TokenRejection::Malformed));
        assert_eq!(other.decode_claims(""), Err(TokenRejection::Malformed));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = config();
        let printed = format!(
            "{:?} {:?}",
            JwtEncoder::new(&config).unwrap(),
            JwtDecoder::new(&config).unwrap()
        );
        assert!(!printed.contains("unit-test-signing-secret"));
    }
}
