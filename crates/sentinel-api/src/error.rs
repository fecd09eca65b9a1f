//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use sentinel_core::error::{AppError, ErrorKind};

/// Message returned for every server-side failure.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Whether the same request may succeed if retried.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub retriable: bool,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::DuplicateEmail | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidCredentials | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::AccountDeactivated | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let AppError { kind, message, .. } = &self.0;
        let status = status_for(*kind);

        let message = if status.is_server_error() && *kind != ErrorKind::Transient {
            tracing::error!(kind = %kind, error = %self.0, "Internal server error");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            if *kind == ErrorKind::Transient {
                tracing::warn!(error = %self.0, "Store unavailable");
            }
            message.clone()
        };

        let body = ApiErrorResponse {
            error: kind.to_string(),
            message,
            retriable: kind.is_retriable(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Response wrapper around [`AppError`].
///
/// `AppError` lives in `sentinel-core`, which has no HTTP dependency, so the
/// `IntoResponse` impl hangs off this local newtype instead.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Result type returned by every handler.
pub type ApiResult<T> = Result<T, ApiError>;
