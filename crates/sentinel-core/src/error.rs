//! Unified application error types for Sentinel.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the `?` operator. The [`ErrorKind`] taxonomy is what
//! callers branch on; the message is what a client gets to read.

use std::fmt;
use thiserror::Error;

/// Caller-visible message for any failed token or session check.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";
/// Caller-visible message for a wrong email or a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";
/// Caller-visible message for a correct login on a disabled account.
pub const ACCOUNT_DEACTIVATED_MESSAGE: &str = "Account is deactivated";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Registration conflict on an existing email.
    DuplicateEmail,
    /// Wrong email or password; the two causes are indistinguishable.
    InvalidCredentials,
    /// Credentials matched but the account is disabled.
    AccountDeactivated,
    /// Missing, malformed, tampered, expired, or revoked token.
    Unauthenticated,
    /// Authenticated but the role is insufficient.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// The backing store timed out or is unavailable; retriable.
    Transient,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Whether a caller may retry the same request unchanged.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEmail => write!(f, "DUPLICATE_EMAIL"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::AccountDeactivated => write!(f, "ACCOUNT_DEACTIVATED"),
            Self::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout Sentinel.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Registration conflict on an existing email.
    pub fn duplicate_email() -> Self {
        Self::new(ErrorKind::DuplicateEmail, "Email already registered")
    }

    /// Wrong email or password.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Correct credentials on a deactivated account.
    pub fn account_deactivated() -> Self {
        Self::new(ErrorKind::AccountDeactivated, ACCOUNT_DEACTIVATED_MESSAGE)
    }

    /// Any failed token/session check. The message is fixed on purpose.
    pub fn unauthenticated() -> Self {
        Self::new(ErrorKind::Unauthenticated, UNAUTHENTICATED_MESSAGE)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a transient (retriable) error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
