//! services/api/src/adapters/file_store.rs
//!
//! A `KeyValueStore` that keeps one JSON file per key in a data directory.
//! Writes go to a temporary file first and are renamed into place.

use async_trait::async_trait;
use quizsmith_core::{KeyValueStore, PortError, PortResult};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PortError::Storage(format!("invalid key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(format!("reading {}: {}", path.display(), e))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        let temp = path.with_extension("json.tmp");
        tokio::fs::write(&temp, value)
            .await
            .map_err(|e| PortError::Storage(format!("writing {}: {}", temp.display(), e)))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|e| PortError::Storage(format!("replacing {}: {}", path.display(), e)))
    }
}
