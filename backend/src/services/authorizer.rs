use std::sync::Arc;

use async_trait::async_trait;

use crate::store::{RecordStore, StoreError, TEACHERS};

/// Decides whether a caller-supplied identity may manage announcements.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn is_valid(&self, identity: &str) -> Result<bool, StoreError>;
}

/// Any username with a record in the `teachers` collection is authorized.
#[derive(Clone)]
pub struct TeacherDirectory {
    store: Arc<dyn RecordStore>,
}

impl TeacherDirectory {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Authorizer for TeacherDirectory {
    async fn is_valid(&self, identity: &str) -> Result<bool, StoreError> {
        if identity.is_empty() {
            return Ok(false);
        }
        Ok(self.store.find_one(TEACHERS, identity).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_known_teacher_is_valid() {
        let store = Arc::new(InMemoryStore::new());
        store
            .insert(
                TEACHERS,
                json!({ "_id": "mchen", "display_name": "Mr. Chen" })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();

        let directory = TeacherDirectory::new(store);
        assert!(directory.is_valid("mchen").await.unwrap());
        assert!(!directory.is_valid("ghost").await.unwrap());
        assert!(!directory.is_valid("").await.unwrap());
    }
}
