//! Upper bound on the duration of a single store operation.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use sentinel_core::AppError;
use sentinel_core::result::AppResult;

/// Caller-visible message when the store does not answer in time.
pub const TRANSIENT_MESSAGE: &str = "Service temporarily unavailable, please retry";

/// Await `fut`, failing with [`ErrorKind::Transient`](sentinel_core::error::ErrorKind::Transient)
/// if it does not complete within `limit`.
///
/// The inner future is dropped on expiry, so nothing it had not yet
/// committed takes effect.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Store operation timed out"
            );
            Err(AppError::transient(TRANSIENT_MESSAGE))
        }
    }
}
