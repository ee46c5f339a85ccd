//! Key-value stores the repository can persist to.
//!
//! Values are opaque strings. A store never interprets what it holds.
use std::{
    collections::{BTreeMap, HashMap},
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{io::AsyncWriteExt, sync::Mutex};

use super::{ResultStore, error::StoreError};

/// An async get/set/remove-by-key store.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = ResultStore<Option<String>>> + Send;

    fn set(&self, key: &str, value: String) -> impl Future<Output = ResultStore<()>> + Send;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = ResultStore<()>> + Send;
}

/// Store kept in process memory, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> ResultStore<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> ResultStore<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> ResultStore<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file, `{"key": "value", ...}`.
///
/// Every call reads the whole file. Writes go to a sibling `.tmp` file that
/// is renamed over the store, so the file on disk is always either the old
/// or the new content. A missing file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a write is staged before the rename.
    pub fn staging_path(&self) -> PathBuf {
        self.sibling("tmp")
    }

    /// Where an unreadable store is moved when it gets reset.
    pub fn quarantine_path(&self) -> PathBuf {
        self.sibling("corrupt")
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }

    async fn read_entries(&self) -> ResultStore<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        // an empty file is not a valid object either
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> ResultStore<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_string_pretty(entries)?;

        let staging = self.staging_path();
        let staged = async {
            let mut file = tokio::fs::File::create(&staging).await?;
            file.write_all(payload.as_bytes()).await?;
            file.sync_all().await
        };
        if let Err(err) = staged.await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err.into());
        }
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> ResultStore<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> ResultStore<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await
    }

    /// An unreadable file is moved aside to [`FileStore::quarantine_path`]
    /// and replaced by an empty store, so removing is always a way out of a
    /// corrupt file.
    async fn remove(&self, key: &str) -> ResultStore<()> {
        let _guard = self.lock.lock().await;
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(StoreError::Corrupt(err)) => {
                let quarantine = self.quarantine_path();
                tracing::warn!(
                    "store {} is unreadable ({err}), moving it to {}",
                    self.path.display(),
                    quarantine.display()
                );
                tokio::fs::rename(&self.path, &quarantine).await?;
                return self.write_entries(&BTreeMap::new()).await;
            }
            Err(err) => return Err(err),
        };
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}

/// The store chosen at startup.
#[derive(Debug)]
pub enum Storage {
    Memory(MemoryStore),
    File(FileStore),
}

impl Storage {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileStore::new(path))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(store) => store.path().display().to_string(),
        }
    }
}

impl KeyValueStore for Storage {
    async fn get(&self, key: &str) -> ResultStore<Option<String>> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> ResultStore<()> {
        match self {
            Self::Memory(store) => store.set(key, value).await,
            Self::File(store) => store.set(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> ResultStore<()> {
        match self {
            Self::Memory(store) => store.remove(key).await,
            Self::File(store) => store.remove(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        store.remove("k").await.unwrap();
    }

    #[tokio::test]
    async fn storage_dispatches_to_memory() {
        let storage = Storage::memory();
        storage.set("alarms", "[]".to_string()).await.unwrap();
        assert_eq!(storage.get("alarms").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.describe(), "memory");
    }
}
