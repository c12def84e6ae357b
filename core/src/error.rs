//! Error types for the resource store.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the HTTP layer maps it to 404
//! while every other store failure is a 500. sqlx's own `RowNotFound` is
//! folded into it at the store boundary so callers never match on sqlx types.

/// Errors returned by `TodoStore` operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row exists for the requested id.
    #[error("todo {id} not found")]
    NotFound { id: i64 },

    /// The statement failed to execute or a row failed to decode.
    #[error("db: query error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Map a sqlx error raised while reading row `id`.
    pub(crate) fn for_row(id: i64, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound { id },
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
