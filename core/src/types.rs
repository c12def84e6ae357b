//! Domain records for the todo service.
//!
//! # Design
//! The same structs serve as sqlx row targets and as JSON wire shapes. The
//! body column is called `todo` both in the table and on the wire, so the
//! Rust-side `body` field is renamed for serde and sqlx alike. Timestamps
//! are UTC throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    #[serde(rename = "todo")]
    #[sqlx(rename = "todo")]
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or updating a todo. Any other fields in the
/// JSON object are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoInput {
    #[serde(rename = "todo")]
    pub body: String,
}

/// An opaque key record. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Secret {
    pub id: i64,
    pub key: String,
}

/// Request payload for creating a secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretInput {
    pub key: String,
}
