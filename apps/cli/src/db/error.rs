//! Database error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("deck already exists: {0}")]
    DuplicateDeck(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
