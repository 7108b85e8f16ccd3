// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Asynchronous key-value store with JSON values.
//!
//! Backends:
//! - Memory (tests and ephemeral runs)
//! - File (one JSON file per key under a data directory)
//! - Offline (every operation fails; used to exercise failure paths)

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors from store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable (offline mode)")]
    Unavailable,

    #[error("I/O error for key '{key}': {message}")]
    Io { key: String, message: String },

    #[error("Corrupt value for key '{key}': {message}")]
    Corrupt { key: String, message: String },

    #[error("Failed to serialize value for key '{key}': {message}")]
    Serialize { key: String, message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Clone)]
enum Backend {
    Memory(Arc<DashMap<String, String>>),
    File(Arc<PathBuf>),
    Offline,
}

/// Key-value store handle. Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct KvStore {
    backend: Backend,
}

impl KvStore {
    /// Create an in-memory store.
    pub fn new_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Create a file-backed store rooted at `dir`.
    ///
    /// The directory is created if missing.
    pub async fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Io {
                key: dir.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(path = %dir.display(), "Opened file store");

        Ok(Self {
            backend: Backend::File(Arc::new(dir)),
        })
    }

    /// Create an offline store for testing.
    ///
    /// All operations return `StoreError::Unavailable`.
    pub fn new_offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Read and parse the value under `key`. `Ok(None)` if absent.
    pub async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let Some(raw) = self.read_raw(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|e| {
            tracing::warn!(key, error = %e, "Stored value is not valid JSON");
            StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Read the value under `key` as `T`. `Ok(None)` if absent.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(value) = self.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_value(value).map(Some).map_err(|e| {
            tracing::warn!(key, error = %e, "Stored value has unexpected shape");
            StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }
        })
    }

    /// Serialize `value` and store it under `key`, replacing any previous value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| {
            tracing::error!(key, error = %e, "Failed to serialize value");
            StoreError::Serialize {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;

        self.write_raw(key, raw).await
    }

    /// Remove `key`. Removing an absent key succeeds.
    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.remove(key);
                Ok(())
            }
            Backend::File(dir) => match tokio::fs::remove_file(key_path(dir, key)).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error(key, e)),
            },
            Backend::Offline => Err(offline(key)),
        }
    }

    async fn read_raw(&self, key: &str) -> StoreResult<Option<String>> {
        match &self.backend {
            Backend::Memory(map) => Ok(map.get(key).map(|v| v.value().clone())),
            Backend::File(dir) => match tokio::fs::read_to_string(key_path(dir, key)).await {
                Ok(raw) => Ok(Some(raw)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error(key, e)),
            },
            Backend::Offline => Err(offline(key)),
        }
    }

    /// Store an already-serialized value. Writes to a temp file and renames
    /// it into place so readers never see a partial value.
    pub(crate) async fn write_raw(&self, key: &str, raw: String) -> StoreResult<()> {
        match &self.backend {
            Backend::Memory(map) => {
                map.insert(key.to_string(), raw);
                Ok(())
            }
            Backend::File(dir) => {
                let path = key_path(dir, key);
                let tmp = path.with_extension("json.tmp");
                tokio::fs::write(&tmp, raw)
                    .await
                    .map_err(|e| io_error(key, e))?;
                tokio::fs::rename(&tmp, &path)
                    .await
                    .map_err(|e| io_error(key, e))
            }
            Backend::Offline => Err(offline(key)),
        }
    }
}

/// File name for a key: URL-encoded so any key maps to a single safe name.
fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.json", urlencoding::encode(key)))
}

fn io_error(key: &str, err: std::io::Error) -> StoreError {
    tracing::error!(key, error = %err, "Store I/O error");
    StoreError::Io {
        key: key.to_string(),
        message: err.to_string(),
    }
}

fn offline(key: &str) -> StoreError {
    tracing::warn!(key, "Store operation attempted while offline");
    StoreError::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(tag: &str) -> PathBuf {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("silverfit_{}_{}_{}", tag, std::process::id(), nanos))
    }

    #[tokio::test]
    async fn test_memory_get_set_delete() {
        let store = KvStore::new_memory();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k", &json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));

        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);

        // Deleting again is fine
        store.delete("k").await.unwrap();
    }

    #[tokio::test]
    async fn test_clones_share_backend() {
        let store = KvStore::new_memory();
        let other = store.clone();
        store.set("shared", "value").await.unwrap();
        assert_eq!(
            other.get_as::<String>("shared").await.unwrap(),
            Some("value".to_string())
        );
    }

    #[tokio::test]
    async fn test_corrupt_value_is_error() {
        let store = KvStore::new_memory();
        store.write_raw("bad", "{not json".to_string()).await.unwrap();

        let err = store.get("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corrupt() {
        let store = KvStore::new_memory();
        store.set("num", &42).await.unwrap();

        let err = store.get_as::<String>("num").await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = KvStore::new_offline();
        assert_eq!(store.get("k").await.unwrap_err(), StoreError::Unavailable);
        assert_eq!(store.set("k", &1).await.unwrap_err(), StoreError::Unavailable);
        assert_eq!(store.delete("k").await.unwrap_err(), StoreError::Unavailable);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir("reopen");

        let store = KvStore::open(&dir).await.unwrap();
        store.set("session", "ana@example.com").await.unwrap();
        store.set("user:ana@example.com", &json!({"x": true})).await.unwrap();

        let reopened = KvStore::open(&dir).await.unwrap();
        assert_eq!(
            reopened.get_as::<String>("session").await.unwrap(),
            Some("ana@example.com".to_string())
        );
        assert_eq!(
            reopened.get("user:ana@example.com").await.unwrap(),
            Some(json!({"x": true}))
        );

        reopened.delete("session").await.unwrap();
        assert_eq!(reopened.get("session").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_key_path_is_encoded() {
        let path = key_path(Path::new("/data"), "user:a/b");
        assert_eq!(path, PathBuf::from("/data/user%3Aa%2Fb.json"));
    }
}
