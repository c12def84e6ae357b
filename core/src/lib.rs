//! Domain types and persistence for the todo service.
//!
//! # Overview
//! `TodoStore` is the only seam that touches persistent state. `PgStore` is
//! the production implementation over a Postgres pool; `MemoryStore` is a
//! drop-in double for exercising the HTTP layer without a database.
//!
//! # Design
//! - Each operation is one SQL statement; `update` is a write followed by a
//!   re-read, with an affected-row check so a missing id is `NotFound`.
//! - No caching. The database is the sole source of truth.
//! - Timestamps are `DateTime<Utc>` and stored as `TIMESTAMPTZ`.

pub mod error;
pub mod memory;
pub mod pg;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg::{PgStore, PoolOptions};
pub use store::TodoStore;
pub use types::{Secret, SecretInput, Todo, TodoInput};
