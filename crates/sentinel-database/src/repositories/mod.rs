//! PostgreSQL implementations of the store traits.

pub mod access_rule;
pub mod security_log;
pub mod session;
pub mod user;

pub use access_rule::AccessRuleRepository;
pub use security_log::SecurityLogRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use sentinel_core::error::{AppError, ErrorKind};

use crate::timeout::TRANSIENT_MESSAGE;

/// Name of the unique index on `lower(email)`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

/// Map a sqlx error into the application taxonomy.
///
/// Pool exhaustion and I/O failures are retriable; a violation of the
/// email index becomes `DuplicateEmail`; anything else is a database error.
pub(crate) fn map_sqlx(context: &'static str, err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::warn!(context, error = %err, "Store unavailable");
            AppError::with_source(ErrorKind::Transient, TRANSIENT_MESSAGE, err)
        }
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(USERS_EMAIL_KEY) => {
            AppError::duplicate_email()
        }
        _ => AppError::with_source(ErrorKind::Database, context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_timeout_is_transient() {
        let err = map_sqlx("Failed to find user", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, ErrorKind::Transient);
    }

    #[test]
    fn test_row_not_found_is_database() {
        let err = map_sqlx("Failed to find user", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "Failed to find user");
    }
}
