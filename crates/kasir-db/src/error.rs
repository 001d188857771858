//! Storage errors.
//!
//! Two layers: [`DbError`] classifies what SQLite (or the pool) said, and
//! [`CheckoutError`] splits a failed checkout into "the cart is wrong" and
//! "the store is broken". The HTTP layer maps each to a status code.
//!
//! ```text
//!   sqlx::Error ──► DbError ──┬──► catalog CRUD  (constraint → 400, rest → 500)
//!                             │
//!   CoreError ───────────────►└──► CheckoutError::{Rejected, StorageFailure, TimedOut}
//! ```

use std::time::Duration;

use kasir_core::{CoreError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// Catalog input rejected before reaching SQLite.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate value for {column}")]
    UniqueViolation { column: String },

    /// A `category_id` that names no category.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// `stock >= 0`, `price >= 0` and friends, enforced by the schema.
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No pooled connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        DbError::NotFound { entity, id }
    }

    /// Sorts a SQLite error message by the constraint it names, if any.
    fn from_sqlite_message(msg: &str) -> Self {
        const UNIQUE: &str = "UNIQUE constraint failed: ";

        if let Some(column) = msg.strip_prefix(UNIQUE) {
            return DbError::UniqueViolation {
                column: column.to_string(),
            };
        }

        let message = msg.to_string();
        if msg.starts_with("FOREIGN KEY constraint failed") {
            DbError::ForeignKeyViolation { message }
        } else if msg.starts_with("CHECK constraint failed") {
            DbError::CheckViolation { message }
        } else {
            DbError::QueryFailed(message)
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) => DbError::from_sqlite_message(db_err.message()),
            // every lookup that may miss uses fetch_optional
            sqlx::Error::RowNotFound => DbError::Internal("expected row was missing".to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DbError::ConnectionFailed(err.to_string())
            }
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// Why a checkout did not commit. Either way nothing was written.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart broke a business rule: unknown product, short stock, bad
    /// quantity, empty cart.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    /// The store failed underneath a valid cart.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DbError),

    /// The deadline passed before COMMIT was issued; staged writes were
    /// rolled back.
    #[error("Checkout did not complete within {0:?}")]
    TimedOut(Duration),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::StorageFailure(err.into())
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            DbError::not_found("Product", 42).to_string(),
            "Product not found: 42"
        );
    }

    #[test]
    fn test_sqlite_messages_are_classified() {
        assert!(matches!(
            DbError::from_sqlite_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            DbError::from_sqlite_message("CHECK constraint failed: stock >= 0"),
            DbError::CheckViolation { .. }
        ));
        match DbError::from_sqlite_message("UNIQUE constraint failed: categories.name") {
            DbError::UniqueViolation { column } => assert_eq!(column, "categories.name"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            DbError::from_sqlite_message("disk I/O error"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_checkout_error_keeps_domain_and_storage_apart() {
        let rejected: CheckoutError = CoreError::ProductNotFound(999).into();
        assert!(matches!(
            rejected,
            CheckoutError::Rejected(CoreError::ProductNotFound(999))
        ));
        assert_eq!(rejected.to_string(), "Product not found: 999");

        let storage: CheckoutError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(
            storage,
            CheckoutError::StorageFailure(DbError::PoolExhausted)
        ));
    }
}
