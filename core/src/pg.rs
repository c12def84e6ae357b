//! Postgres-backed `TodoStore`.
//!
//! # Design
//! `PgStore` holds only a connection pool; the database owns all
//! concurrency control. The pool's acquire timeout bounds how long a request
//! can wait for a connection, which is the only deadline the store imposes.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::TodoStore;
use crate::types::{Secret, Todo};

const CREATE_TODOS: &str = "\
CREATE TABLE IF NOT EXISTS todos (
    id BIGSERIAL PRIMARY KEY,
    todo TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
)";

const CREATE_SECRETS: &str = "\
CREATE TABLE IF NOT EXISTS secrets (
    id BIGSERIAL PRIMARY KEY,
    key TEXT NOT NULL
)";

const SELECT_ALL: &str = "SELECT id, todo, created_at, updated_at FROM todos ORDER BY id";

const SELECT_ONE: &str = "SELECT id, todo, created_at, updated_at FROM todos WHERE id = $1";

/// Pool sizing and timeouts for `PgStore::connect`.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, options: &PoolOptions) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `todos` and `secrets` tables if they do not exist yet.
    pub async fn bootstrap(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TODOS).execute(&self.pool).await?;
        sqlx::query(CREATE_SECRETS).execute(&self.pool).await?;
        debug!("schema bootstrapped");
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn list(&self) -> StoreResult<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    async fn insert(&self, body: &str) -> StoreResult<Todo> {
        let now = Utc::now();
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (todo, created_at, updated_at) VALUES ($1, $2, $2) \
             RETURNING id, todo, created_at, updated_at",
        )
        .bind(body)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        debug!(id = todo.id, "todo inserted");
        Ok(todo)
    }

    async fn get(&self, id: i64) -> StoreResult<Todo> {
        sqlx::query_as::<_, Todo>(SELECT_ONE)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::for_row(id, e))
    }

    async fn update(&self, id: i64, body: &str) -> StoreResult<Todo> {
        let result = sqlx::query("UPDATE todos SET todo = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(body)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id });
        }
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!(id, removed = result.rows_affected(), "todo deleted");
        Ok(())
    }

    async fn insert_secret(&self, key: &str) -> StoreResult<Secret> {
        let secret = sqlx::query_as::<_, Secret>(
            "INSERT INTO secrets (key) VALUES ($1) RETURNING id, key",
        )
        .bind(key)
        .fetch_one(&self.pool)
        .await?;
        Ok(secret)
    }
}
