//! The single error type shared by the whole engine.
//!
//! Lookups that find nothing are not errors; they return `Ok(None)`. Everything
//! else that can go wrong against the store ends up in one of these variants
//! and is handed back to the caller untouched. There are no retries.

use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EavError>;

#[derive(Debug, Error)]
pub enum EavError {
    /// A uniqueness or foreign key constraint of the physical schema rejected a write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A cell value or column options could not be turned into a structured value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("store is closed")]
    StoreClosed,

    /// The store was used directly from inside its own [`crate::persistence::Store::transaction`].
    #[error("store is held by a transaction on this thread; use the transaction handle")]
    TransactionActive,

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: i64 },

    /// Persisted data that no longer decodes, such as a broken JSON blob.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for EavError {
    fn from(error: rusqlite::Error) -> Self {
        //! Split constraint failures off from every other SQLite failure so the
        //! caller can tell a rejected write from a broken store.

        match error {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                let detail = message
                    .clone()
                    .unwrap_or_else(|| failure.to_string());
                EavError::ConstraintViolation(detail)
            }
            other => EavError::Sqlite(other),
        }
    }
}
