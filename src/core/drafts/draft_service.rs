// Local draft service - keeps the in-progress letter and persists it on demand.
//
// Exactly one draft exists. Loading never fails: a missing or unreadable
// stored value is treated as "no draft". Saving overwrites the stored value.

use super::draft_models::{Draft, DRAFT_KEY};
use super::draft_store::{KeyValueStore, StoreError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct DraftService<S: KeyValueStore> {
    store: S,
    draft: RwLock<Draft>,
    saving: AtomicBool,
}

impl<S: KeyValueStore> DraftService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            draft: RwLock::new(Draft::empty()),
            saving: AtomicBool::new(false),
        }
    }

    /// Reads the persisted draft into memory and returns it.
    pub async fn load(&self) -> Draft {
        let loaded = match self.store.get(DRAFT_KEY).await {
            Ok(Some(raw)) => serde_json::from_str::<Draft>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Stored draft is unreadable, starting empty: {}", e);
                Draft::empty()
            }),
            Ok(None) => Draft::empty(),
            Err(e) => {
                tracing::warn!("Failed to read stored draft, starting empty: {}", e);
                Draft::empty()
            }
        };

        *self.draft.write().await = loaded.clone();
        loaded
    }

    pub async fn current(&self) -> Draft {
        self.draft.read().await.clone()
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        self.draft.write().await.title = title.into();
    }

    pub async fn set_content(&self, content: impl Into<String>) {
        self.draft.write().await.content = content.into();
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// Stamps the draft with the current time and overwrites the stored copy.
    pub async fn save(&self) -> Result<Draft, DraftError> {
        let _saving = SavingFlag::raise(&self.saving);
        self.persist_current().await
    }

    async fn persist_current(&self) -> Result<Draft, DraftError> {
        let mut updated = self.current().await;
        updated.last_saved_at = Some(Utc::now());

        let raw = serde_json::to_string(&updated)?;
        self.store.set(DRAFT_KEY, raw).await?;

        *self.draft.write().await = updated.clone();
        tracing::debug!(title = %updated.title, "Draft saved locally");
        Ok(updated)
    }

    /// Drops the stored draft and resets memory to the empty draft.
    pub async fn clear(&self) -> Result<(), DraftError> {
        self.store.remove(DRAFT_KEY).await?;
        *self.draft.write().await = Draft::empty();
        Ok(())
    }
}

/// Holds `saving` up for as long as it lives, including when the save
/// future is dropped part way through.
struct SavingFlag<'a>(&'a AtomicBool);

impl<'a> SavingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SavingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Saves the draft every `period` while it has content.
///
/// The first save happens one full period after spawning. Errors are logged
/// and the timer keeps running; abort the handle to stop it.
pub fn spawn_autosave<S>(service: Arc<DraftService<S>>, period: Duration) -> JoinHandle<()>
where
    S: KeyValueStore + 'static,
{
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);

        loop {
            ticker.tick().await;

            if service.current().await.content.is_empty() {
                continue;
            }

            if let Err(e) = service.save().await {
                tracing::warn!("Autosave failed: {}", e);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for testing
    #[derive(Default)]
    struct MockStore {
        values: Mutex<HashMap<String, String>>,
        writes: Mutex<usize>,
        fail_reads: bool,
    }

    impl MockStore {
        fn with_value(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        fn writes(&self) -> usize {
            *self.writes.lock().unwrap()
        }
    }

    #[async_trait]
    impl KeyValueStore for MockStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads {
                return Err(StoreError::Backend("disk on fire".to_string()));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            *self.writes.lock().unwrap() += 1;
            self.values.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.values.lock().unwrap().remove(key);
            Ok(())
        }
    }

    #[async_trait]
    impl KeyValueStore for Arc<MockStore> {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            (**self).get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
            (**self).set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            (**self).remove(key).await
        }
    }

    /// Store whose writes never finish.
    struct StalledStore;

    #[async_trait]
    impl KeyValueStore for StalledStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            std::future::pending().await
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_aborted_save_resets_saving_flag() {
        let service = Arc::new(DraftService::new(StalledStore));
        service.set_content("<p>half written</p>").await;

        let task = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.save().await })
        };
        while !service.is_saving() {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(!service.is_saving());
    }

    #[tokio::test]
    async fn test_load_without_stored_value_is_empty() {
        let service = DraftService::new(MockStore::default());
        let draft = service.load().await;
        assert_eq!(draft, Draft::empty());
        assert_eq!(draft.title, "");
        assert_eq!(draft.content, "");
        assert!(draft.last_saved_at.is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_value_is_empty() {
        let service = DraftService::new(MockStore::with_value(DRAFT_KEY, "{not json"));
        assert_eq!(service.load().await, Draft::empty());
    }

    #[tokio::test]
    async fn test_load_store_failure_is_empty() {
        let store = MockStore {
            fail_reads: true,
            ..Default::default()
        };
        let service = DraftService::new(store);
        assert_eq!(service.load().await, Draft::empty());
    }

    #[tokio::test]
    async fn test_save_then_reload_returns_same_draft() {
        let store = Arc::new(MockStore::default());
        let service = DraftService::new(Arc::clone(&store));
        service.load().await;
        service.set_title("To Grandma").await;
        service.set_content("<p>Hello&nbsp;there</p>").await;

        let before = Utc::now();
        let saved = service.save().await.unwrap();
        assert!(saved.last_saved_at.unwrap() >= before);
        assert!(!service.is_saving());

        // Simulate a reload with a fresh service over the same store
        let reloaded = DraftService::new(Arc::clone(&store)).load().await;
        assert_eq!(reloaded, saved);
        assert_eq!(reloaded.title, "To Grandma");
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_value() {
        let store = Arc::new(MockStore::default());
        let service = DraftService::new(Arc::clone(&store));
        service.set_title("first").await;
        service.save().await.unwrap();
        service.set_title("second").await;
        service.save().await.unwrap();

        let reloaded = DraftService::new(Arc::clone(&store)).load().await;
        assert_eq!(reloaded.title, "second");
        assert_eq!(store.values.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_then_load_is_empty() {
        let store = Arc::new(MockStore::default());
        let service = DraftService::new(Arc::clone(&store));
        service.set_title("gone soon").await;
        service.save().await.unwrap();

        service.clear().await.unwrap();
        assert_eq!(service.current().await, Draft::empty());
        assert_eq!(
            DraftService::new(Arc::clone(&store)).load().await,
            Draft::empty()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_skips_empty_content() {
        let store = Arc::new(MockStore::default());
        let service = Arc::new(DraftService::new(Arc::clone(&store)));
        let handle = spawn_autosave(Arc::clone(&service), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(95)).await;
        assert_eq!(store.writes(), 0);

        service.set_content("<p>now there is text</p>").await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.writes(), 1);
        assert!(service.current().await.last_saved_at.is_some());

        handle.abort();
    }
}
