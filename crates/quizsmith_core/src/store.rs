//! crates/quizsmith_core/src/store.rs
//!
//! Settings and quiz history on top of the `KeyValueStore` port. Everything is
//! stored as JSON under two keys. Loads never fail on bad data: a malformed blob
//! degrades to defaults, only the backend itself can return an error.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;
use uuid::Uuid;

use crate::domain::{HistoryEntry, ProviderSettings};
use crate::ports::{KeyValueStore, PortError, PortResult};

pub const SETTINGS_KEY: &str = "settings";
pub const HISTORY_KEY: &str = "history";

/// The most recent quizzes kept in history.
pub const HISTORY_LIMIT: usize = 20;

//=========================================================================================
// In-memory backend
//=========================================================================================

/// A process-local `KeyValueStore`.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let entries = self.entries.lock().map_err(|e| PortError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let mut entries = self.entries.lock().map_err(|e| PortError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//=========================================================================================
// Repository
//=========================================================================================

/// Typed access to persisted settings and history.
#[derive(Clone)]
pub struct StudyStore {
    kv: Arc<dyn KeyValueStore>,
}

impl StudyStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> PortResult<T> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(key, error = %e, "Persisted value is malformed, using defaults");
                Ok(T::default())
            }
        }
    }

    async fn save<T: serde::Serialize>(&self, key: &str, value: &T) -> PortResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| PortError::Storage(e.to_string()))?;
        self.kv.set(key, &raw).await
    }

    pub async fn load_settings(&self) -> PortResult<ProviderSettings> {
        self.load_or_default(SETTINGS_KEY).await
    }

    pub async fn save_settings(&self, settings: &ProviderSettings) -> PortResult<()> {
        self.save(SETTINGS_KEY, settings).await
    }

    /// History, newest first.
    pub async fn load_history(&self) -> PortResult<Vec<HistoryEntry>> {
        self.load_or_default(HISTORY_KEY).await
    }

    /// Inserts an entry at the front, evicting the oldest beyond the limit.
    pub async fn record_quiz(&self, entry: HistoryEntry) -> PortResult<Vec<HistoryEntry>> {
        let mut history = self.load_history().await?;
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);
        self.save(HISTORY_KEY, &history).await?;
        Ok(history)
    }

    pub async fn find_history_entry(&self, id: Uuid) -> PortResult<HistoryEntry> {
        self.load_history()
            .await?
            .into_iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| PortError::NotFound(format!("history entry {}", id)))
    }

    pub async fn delete_history_entry(&self, id: Uuid) -> PortResult<()> {
        let mut history = self.load_history().await?;
        let before = history.len();
        history.retain(|entry| entry.id != id);
        if history.len() == before {
            return Err(PortError::NotFound(format!("history entry {}", id)));
        }
        self.save(HISTORY_KEY, &history).await
    }

    pub async fn clear_history(&self) -> PortResult<()> {
        self.save(HISTORY_KEY, &Vec::<HistoryEntry>::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DifficultyLevel, ProviderKind};

    fn store() -> (Arc<InMemoryStore>, StudyStore) {
        let kv = Arc::new(InMemoryStore::new());
        (kv.clone(), StudyStore::new(kv))
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let (_, store) = store();
        let mut settings = ProviderSettings::default();
        settings.provider = ProviderKind::Openai;
        settings.openai.base_url = "http://localhost:11434/v1".to_string();
        settings.openai.model = "llama3.2".to_string();
        settings.gemini.api_key = "g-key".to_string();

        store.save_settings(&settings).await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn missing_and_malformed_settings_use_defaults() {
        let (kv, store) = store();
        assert_eq!(store.load_settings().await.unwrap(), ProviderSettings::default());

        kv.set(SETTINGS_KEY, "{not json").await.unwrap();
        assert_eq!(store.load_settings().await.unwrap(), ProviderSettings::default());
    }

    #[tokio::test]
    async fn old_settings_shape_is_upgraded() {
        let (kv, store) = store();
        kv.set(SETTINGS_KEY, r#"{"gemini":{"apiKey":"legacy"}}"#).await.unwrap();

        let settings = store.load_settings().await.unwrap();
        assert_eq!(settings.gemini.api_key, "legacy");
        assert_eq!(settings.provider, ProviderKind::Gemini);
        assert_eq!(settings.openai.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn history_keeps_the_twenty_newest() {
        let (_, store) = store();
        for i in 0..=HISTORY_LIMIT {
            let name = format!("file-{}.pdf", i);
            store.record_quiz(HistoryEntry::new(name, DifficultyLevel::Medium, vec![])).await.unwrap();
        }

        let history = store.load_history().await.unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].file_name, "file-20.pdf");
        assert_eq!(history[HISTORY_LIMIT - 1].file_name, "file-1.pdf");
        assert!(history.iter().all(|entry| entry.file_name != "file-0.pdf"));
    }

    #[tokio::test]
    async fn malformed_history_is_empty() {
        let (kv, store) = store();
        kv.set(HISTORY_KEY, r#"{"oops":true}"#).await.unwrap();
        assert!(store.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_delete_and_clear_history() {
        let (_, store) = store();
        let keep = HistoryEntry::new("keep.txt", DifficultyLevel::Easy, vec![]);
        let removed = HistoryEntry::new("removed.txt", DifficultyLevel::Hard, vec![]);
        store.record_quiz(keep.clone()).await.unwrap();
        store.record_quiz(removed.clone()).await.unwrap();

        assert_eq!(store.find_history_entry(keep.id).await.unwrap(), keep);

        store.delete_history_entry(removed.id).await.unwrap();
        assert!(matches!(store.find_history_entry(removed.id).await, Err(PortError::NotFound(_))));
        assert!(matches!(store.delete_history_entry(removed.id).await, Err(PortError::NotFound(_))));

        store.clear_history().await.unwrap();
        assert!(store.load_history().await.unwrap().is_empty());
    }
}
