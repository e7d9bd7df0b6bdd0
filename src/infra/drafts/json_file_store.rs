use crate::core::drafts::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// JSON file store. Every key lives in one file as a flat object:
/// { key: value }
///
/// Writes go to a sibling temp file that is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    cache: RwLock<BTreeMap<String, String>>,
}

impl JsonFileKeyValueStore {
    /// Opens the store. A missing or unreadable file starts out empty.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable store file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    /// Writes `values` to disk. Callers hold the cache write lock, so only
    /// one write-and-rename is in flight per store.
    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(values)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Puts `previous` back under `key` after a failed write.
fn restore(cache: &mut BTreeMap<String, String>, key: &str, previous: Option<String>) {
    match previous {
        Some(value) => {
            cache.insert(key.to_string(), value);
        }
        None => {
            cache.remove(key);
        }
    }
}

#[async_trait]
impl KeyValueStore for JsonFileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        let previous = cache.insert(key.to_string(), value);

        if let Err(e) = self.persist(&cache).await {
            restore(&mut cache, key, previous);
            return Err(e);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        let Some(previous) = cache.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.persist(&cache).await {
            restore(&mut cache, key, Some(previous));
            return Err(e);
        }
        Ok(())
    }
}
