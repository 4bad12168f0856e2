use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{take_or_assign_id, with_id, Document, RecordStore, StoreError};

/// Process-local store. Collections keep insertion order so listings are
/// stable, like the `created_at` ordering of the Postgres backend.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<(String, Document)>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .map(|(id, body)| with_id(id, body.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|records| {
            records
                .iter()
                .find(|(key, _)| key == id)
                .map(|(key, body)| with_id(key, body.clone()))
        }))
    }

    async fn insert(&self, collection: &str, mut record: Document) -> Result<String, StoreError> {
        let id = take_or_assign_id(&mut record);
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();
        if records.iter().any(|(key, _)| *key == id) {
            return Err(StoreError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }
        records.push((id.clone(), record));
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some((_, body)) = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|(key, _)| key == id))
        else {
            return Ok(false);
        };
        body.extend(fields);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(records) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = records.len();
        records.retain(|(key, _)| key != id);
        Ok((before - records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ID_FIELD;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_that_round_trips() {
        let store = InMemoryStore::new();
        let id = store
            .insert("announcements", doc(json!({ "message": "hi" })))
            .await
            .unwrap();

        let found = store.find_one("announcements", &id).await.unwrap().unwrap();
        assert_eq!(found[ID_FIELD], json!(id));
        assert_eq!(found["message"], json!("hi"));
    }

    #[tokio::test]
    async fn test_insert_keeps_caller_id() {
        let store = InMemoryStore::new();
        let id = store
            .insert("teachers", doc(json!({ "_id": "mrodriguez", "display_name": "Ms. Rodriguez" })))
            .await
            .unwrap();
        assert_eq!(id, "mrodriguez");

        let dup = store
            .insert("teachers", doc(json!({ "_id": "mrodriguez" })))
            .await;
        assert!(matches!(dup, Err(StoreError::DuplicateId { .. })));
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = InMemoryStore::new();
        for n in 0..3 {
            store
                .insert("announcements", doc(json!({ "n": n })))
                .await
                .unwrap();
        }
        let all = store.find_all("announcements").await.unwrap();
        let ns: Vec<_> = all.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);
        assert!(store.find_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = InMemoryStore::new();
        let id = store
            .insert("announcements", doc(json!({ "message": "a", "created_by": "t1" })))
            .await
            .unwrap();

        assert!(store
            .update("announcements", &id, doc(json!({ "message": "b" })))
            .await
            .unwrap());
        let found = store.find_one("announcements", &id).await.unwrap().unwrap();
        assert_eq!(found["message"], json!("b"));
        assert_eq!(found["created_by"], json!("t1"));

        assert!(!store
            .update("announcements", "nope", doc(json!({ "message": "c" })))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_delete_counts_removed() {
        let store = InMemoryStore::new();
        let id = store
            .insert("announcements", doc(json!({ "message": "bye" })))
            .await
            .unwrap();
        assert_eq!(store.delete("announcements", &id).await.unwrap(), 1);
        assert_eq!(store.delete("announcements", &id).await.unwrap(), 0);
        assert!(store.find_one("announcements", &id).await.unwrap().is_none());
    }
}
