//! Error types for the storage adapter.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// SQLITE_ERROR, SQLITE_BUSY and SQLITE_LOCKED primary result codes.
const SQLITE_ERROR: i32 = 1;
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Errors raised by [`crate::Store`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would break the ticket/todo relationship.
    #[error("referential integrity violation: {0}")]
    ForeignKey(String),

    /// A storage-level constraint (CHECK, NOT NULL, UNIQUE) rejected a write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The database is locked by another writer. Safe to retry.
    #[error("database is busy")]
    Busy,

    /// A stored row could not be read back into an entity.
    #[error("corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },

    /// SQLite refused a caller-authored read query (unknown table or column,
    /// syntax the gate's parser accepts but the engine does not).
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A parameter could not be encoded.
    #[error("failed to bind parameter: {0}")]
    Encode(String),

    /// The database file's directory could not be prepared.
    #[error("failed to prepare storage location: {0}")]
    Io(#[from] std::io::Error),

    /// Any other engine failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether the same call may succeed if repeated later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Busy)
    }

    /// Classify an error raised while running a caller's read query.
    pub(crate) fn from_read_query(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.code().and_then(|c| c.parse::<i32>().ok()).map(|c| c & 0xff) == Some(SQLITE_ERROR)
        {
            return StoreError::QueryFailed(db.message().to_string());
        }
        StoreError::from(err)
    }

    pub(crate) fn corrupt(table: &'static str, reason: impl ToString) -> Self {
        StoreError::CorruptRow {
            table,
            reason: reason.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => return StoreError::Busy,
            sqlx::Error::Database(db) => {
                match db.kind() {
                    ErrorKind::ForeignKeyViolation => {
                        return StoreError::ForeignKey(db.message().to_string());
                    }
                    ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::UniqueViolation => {
                        return StoreError::Constraint(db.message().to_string());
                    }
                    _ => {}
                }
                // Extended result codes carry the primary code in the low byte.
                if let Some(code) = db.code()
                    && let Ok(code) = code.parse::<i32>()
                    && matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)
                {
                    return StoreError::Busy;
                }
            }
            _ => {}
        }
        StoreError::Database(err)
    }
}
