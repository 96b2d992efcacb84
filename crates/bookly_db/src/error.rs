//! Error types for the database client

use bookly_common::BooklyError;
use thiserror::Error;

/// Postgres SQLSTATE for a serialization failure under SERIALIZABLE isolation.
const PG_SERIALIZATION_FAILURE: &str = "40001";
/// Postgres SQLSTATE for a detected deadlock.
const PG_DEADLOCK_DETECTED: &str = "40P01";

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A stored value could not be turned back into a domain value
    #[error("Database decode error: {0}")]
    DecodeError(String),

    /// The `BOOKED` uniqueness backstop fired
    #[error("Slot already booked: {0}")]
    SlotTaken(String),

    /// A concurrent transaction won; the whole transaction may be retried
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),
}

impl DbError {
    /// Maps a failed write to `SlotTaken` when it hit the booked-slot unique index,
    /// to `SerializationFailure` on a Postgres serialization or deadlock abort, and
    /// to `QueryError` otherwise.
    pub fn classify_write(err: sqlx::Error, context: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return DbError::SlotTaken(context.to_string());
            }
            if let Some(code) = db_err.code() {
                if code == PG_SERIALIZATION_FAILURE || code == PG_DEADLOCK_DETECTED {
                    return DbError::SerializationFailure(format!("{}: {}", context, db_err));
                }
            }
        }
        DbError::QueryError(format!("{}: {}", context, err))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::SerializationFailure(_))
    }
}

impl From<DbError> for BooklyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::SlotTaken(_) => BooklyError::Conflict(err.to_string()),
            other => BooklyError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_taken_maps_to_conflict() {
        let err: BooklyError = DbError::SlotTaken("svc_2025-03-10_09:00".into()).into();
        assert!(matches!(err, BooklyError::Conflict(_)));
    }

    #[test]
    fn storage_failures_map_to_internal() {
        let err: BooklyError = DbError::QueryError("boom".into()).into();
        assert!(matches!(err, BooklyError::Internal(_)));
        assert!(!DbError::QueryError("boom".into()).is_retryable());
        assert!(DbError::SerializationFailure("x".into()).is_retryable());
    }

    #[test]
    fn non_database_errors_classify_as_query_errors() {
        let err = DbError::classify_write(sqlx::Error::RowNotFound, "insert appointment");
        assert!(matches!(err, DbError::QueryError(_)));
    }
}
