//! The persistence capability shared by the production and in-memory stores.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Secret, Todo};

/// CRUD over the `todos` table plus append-only `secrets`.
///
/// Every method is a single statement against the backing store, except
/// `update`, which writes and then re-reads without a transaction.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos. Empty when there are none, never absent.
    async fn list(&self) -> StoreResult<Vec<Todo>>;

    /// Insert a todo, assigning its id and both timestamps.
    async fn insert(&self, body: &str) -> StoreResult<Todo>;

    /// Fetch one todo, or `StoreError::NotFound`.
    async fn get(&self, id: i64) -> StoreResult<Todo>;

    /// Replace the body and refresh `updated_at`, then re-read the row.
    /// Reports `StoreError::NotFound` when no row matched.
    async fn update(&self, id: i64, body: &str) -> StoreResult<Todo>;

    /// Delete unconditionally. Succeeds whether or not the row existed.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    async fn insert_secret(&self, key: &str) -> StoreResult<Secret>;
}
