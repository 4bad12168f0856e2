//! Document persistence behind a small collection/id interface.
//!
//! Records are JSON objects. The identifier travels in the `_id` field as a
//! string; every backend must accept that string back as a lookup key.

pub mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::InMemoryStore;

pub const ANNOUNCEMENTS: &str = "announcements";
pub const TEACHERS: &str = "teachers";

/// Field carrying the record identifier.
pub const ID_FIELD: &str = "_id";

pub type Document = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored record in {collection} is not a JSON object")]
    NotAnObject { collection: String },

    #[error("record {id} already exists in {collection}")]
    DuplicateId { collection: String, id: String },
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Persist a record and return its identifier. A string `_id` already on
    /// the record is kept; otherwise the store assigns one.
    async fn insert(&self, collection: &str, record: Document) -> Result<String, StoreError>;

    /// Shallow-merge `fields` into the record. Returns `false` when no record
    /// matched `id`.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<bool, StoreError>;

    /// Returns the number of records removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError>;
}

/// Split the caller-provided `_id` off a record, or mint a new one.
pub(crate) fn take_or_assign_id(record: &mut Document) -> String {
    match record.remove(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => uuid::Uuid::new_v4().to_string(),
    }
}

/// Attach the identifier to a record body for return across the boundary.
pub(crate) fn with_id(id: &str, mut body: Document) -> Document {
    body.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    body
}
