//! In-memory `TodoStore` used as a test double for the HTTP layer.
//!
//! Mirrors `PgStore` semantics: ids start at 1 and are never reused, update
//! of a missing row is `NotFound`, delete never fails.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::TodoStore;
use crate::types::{Secret, Todo};

#[derive(Debug, Default)]
struct Tables {
    todos: BTreeMap<i64, Todo>,
    secrets: Vec<Secret>,
    last_todo_id: i64,
    last_secret_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every secret inserted so far.
    pub async fn secrets(&self) -> Vec<Secret> {
        self.tables.read().await.secrets.clone()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        Ok(self.tables.read().await.todos.values().cloned().collect())
    }

    async fn insert(&self, body: &str) -> StoreResult<Todo> {
        let mut tables = self.tables.write().await;
        tables.last_todo_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: tables.last_todo_id,
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn get(&self, id: i64) -> StoreResult<Todo> {
        self.tables
            .read()
            .await
            .todos
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: i64, body: &str) -> StoreResult<Todo> {
        let mut tables = self.tables.write().await;
        let todo = tables.todos.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        todo.body = body.to_string();
        todo.updated_at = Utc::now();
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.tables.write().await.todos.remove(&id);
        Ok(())
    }

    async fn insert_secret(&self, key: &str) -> StoreResult<Secret> {
        let mut tables = self.tables.write().await;
        tables.last_secret_id += 1;
        let secret = Secret {
            id: tables.last_secret_id,
            key: key.to_string(),
        };
        tables.secrets.push(secret.clone());
        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_is_empty_not_absent() {
        let store = MemoryStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_then_get_round_trips_body() {
        let store = MemoryStore::new();
        let created = store.insert("buy milk").await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn update_twice_is_idempotent() {
        let store = MemoryStore::new();
        let created = store.insert("buy milk").await.unwrap();

        store.update(created.id, "buy oat milk").await.unwrap();
        let updated = store.update(created.id, "buy oat milk").await.unwrap();
        assert_eq!(updated.body, "buy oat milk");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(99, "nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 99 }));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_is_terminal_and_unconditional() {
        let store = MemoryStore::new();
        let created = store.insert("walk dog").await.unwrap();

        store.delete(created.id).await.unwrap();
        assert!(matches!(
            store.get(created.id).await,
            Err(StoreError::NotFound { .. })
        ));
        // deleting again still succeeds
        store.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn list_matches_live_ids_and_ids_are_not_reused() {
        let store = MemoryStore::new();
        let a = store.insert("a").await.unwrap();
        let b = store.insert("b").await.unwrap();
        let c = store.insert("c").await.unwrap();
        store.delete(b.id).await.unwrap();
        let d = store.insert("d").await.unwrap();

        let ids: Vec<i64> = store.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id, d.id]);
        assert_eq!(d.id, 4);
    }

    #[tokio::test]
    async fn secrets_are_appended_with_fresh_ids() {
        let store = MemoryStore::new();
        let first = store.insert_secret("k1").await.unwrap();
        let second = store.insert_secret("k2").await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.secrets().await, vec![first, second]);
    }
}
