use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::store::{take_or_assign_id, with_id, Document, RecordStore, StoreError};

/// `RecordStore` over the `documents` table. Identifiers are plain TEXT keys,
/// so an identifier that was never issued simply finds nothing.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(collection: &str, id: &str, body: Value) -> Result<Document, StoreError> {
    match body {
        Value::Object(map) => Ok(with_id(id, map)),
        _ => Err(StoreError::NotAnObject {
            collection: collection.to_string(),
        }),
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, (String, Value)>(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, body)| into_document(collection, &id, body))
            .collect()
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|body| into_document(collection, id, body)).transpose()
    }

    async fn insert(&self, collection: &str, mut record: Document) -> Result<String, StoreError> {
        let id = take_or_assign_id(&mut record);
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(&record))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE documents SET body = body || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&fields))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
