//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use sentinel_core::config::AuthConfig;
use sentinel_core::error::AppError;

use super::claims::Claims;
use super::signing_algorithm;

/// A freshly signed token and the claims it carries.
#[derive(Clone)]
pub struct IssuedToken {
    /// The compact JWS string.
    pub token: String,
    /// The signed claims.
    pub claims: Claims,
}

impl IssuedToken {
    /// Absolute expiry of the token.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

/// Creates signed access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    header: Header,
    issuer: String,
    default_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("algorithm", &self.header.alg)
            .field("issuer", &self.issuer)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let default_ttl = Duration::try_seconds(config.access_token_ttl_seconds()).ok_or_else(|| {
            AppError::configuration("auth.access_token_ttl_minutes is out of range")
        })?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            header: Header::new(signing_algorithm(config)?),
            issuer: config.jwt_issuer.clone(),
            default_ttl,
        })
    }

    /// The configured access token lifetime.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject` bound to `session_id`, valid for `ttl`.
    ///
    /// A zero `ttl` yields a token that is already expired.
    pub fn issue(&self, subject: &str, session_id: Uuid, ttl: Duration) -> Result<IssuedToken, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            sid: session_id,
            iat: now,
            exp: now.saturating_add(ttl.num_seconds().max(0)),
            jti: Uuid::new_v4(),
            iss: self.issuer.clone(),
        };

        // The signing error never carries key material, only its kind is reported.
        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {:?}", e.kind())))?;

        Ok(IssuedToken { token, claims })
    }

    /// [`issue`](Self::issue) with the configured TTL.
    pub fn issue_default(&self, subject: &str, session_id: Uuid) -> Result<IssuedToken, AppError> {
        self.issue(subject, session_id, self.default_ttl)
    }
}
