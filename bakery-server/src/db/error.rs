//! Database error classification
//!
//! Driver errors are folded into a few classes that the HTTP layer maps to
//! status codes: duplicate key, missing row, connection trouble, other.
//!
//! A refused or dropped connection reaches us as `Io`, or as `PoolTimedOut`
//! once the pool stops retrying, never as a server error code.

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Unique key violation (MySQL `ER_DUP_ENTRY`)
    #[error("duplicate entry: {message}")]
    Duplicate { message: String },

    /// Update/delete matched zero rows
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Connection refused, lost, or pool exhausted
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Self::Duplicate {
                message: db_err.message().to_owned(),
            },
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err),
            other => Self::Sqlx(other),
        }
    }
}
