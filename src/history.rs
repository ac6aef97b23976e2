use std::sync::Arc;
use tracing::warn;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "articles";

/// Persisted list of past summaries, most recent first.
#[derive(Clone)]
pub struct HistoryStore {
    storage: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Reads the stored history. A missing key or a value that does not parse
    /// as a list of records yields an empty history; the cause is only logged.
    pub fn load(&self) -> Vec<ArticleRecord> {
        let raw = match self.storage.get_item(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("History storage unreadable, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ArticleRecord>>(&raw) {
            Ok(articles) => articles,
            Err(e) => {
                warn!("Stored history is not a list of articles, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn save(&self, articles: &[ArticleRecord]) -> Result<()> {
        let raw = serde_json::to_string(articles)?;
        self.storage.set_item(HISTORY_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, HistoryStore) {
        let storage = Arc::new(MemoryStorage::new());
        let history = HistoryStore::new(storage.clone());
        (storage, history)
    }

    #[test]
    fn absent_key_loads_empty() {
        let (_, history) = store();
        assert!(history.load().is_empty());
    }

    #[test]
    fn corrupt_value_loads_empty() {
        let (storage, history) = store();
        storage.set_item(HISTORY_KEY, "{\"url\": 1").unwrap();
        assert!(history.load().is_empty());

        storage.set_item(HISTORY_KEY, "[{\"link\": \"u1\"}]").unwrap();
        assert!(history.load().is_empty());
    }

    #[test]
    fn empty_history_is_stored_as_empty_array() {
        let (storage, history) = store();
        history.save(&[]).unwrap();
        assert_eq!(storage.get_item(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn saved_order_is_preserved() {
        let (storage, history) = store();
        let articles = vec![ArticleRecord::new("u2", "s2"), ArticleRecord::new("u1", "s1")];
        history.save(&articles).unwrap();

        assert_eq!(
            storage.get_item(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"[{"url":"u2","summary":"s2"},{"url":"u1","summary":"s1"}]"#)
        );
        assert_eq!(history.load(), articles);
    }
}
