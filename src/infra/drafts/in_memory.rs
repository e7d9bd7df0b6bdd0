// In-memory implementation of KeyValueStore.
//
// Nothing survives the process. Used for throwaway sessions and tests.

use crate::core::drafts::{KeyValueStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: DashMap<String, String>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drafts::DraftService;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        // Removing a missing key is fine
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_backs_draft_service() {
        let service = DraftService::new(InMemoryKeyValueStore::new());
        service.set_title("memo").await;
        service.save().await.unwrap();
        assert_eq!(service.load().await.title, "memo");

        service.clear().await.unwrap();
        assert!(service.load().await.is_empty());
    }
}
