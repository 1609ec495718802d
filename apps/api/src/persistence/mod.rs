//! Persistence adapter: saves and restores the document through an injected store.
//!
//! Edits go through `schedule_save`, which debounces: each call cancels the
//! pending save (if it has not fired yet) and schedules a new one after the
//! quiescence window, so a burst of edits produces exactly one write carrying
//! the last document. The pending save is a task owned by the adapter.

pub mod store;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::models::document::Document;

pub use store::{DocumentStore, InMemoryStore, RedisStore, StorageError};

pub const DEFAULT_STORAGE_KEY: &str = "resumeData";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct PendingSave {
    handle: JoinHandle<()>,
    document: Document,
}

pub struct PersistenceAdapter {
    store: Arc<dyn DocumentStore>,
    key: String,
    debounce: Duration,
    pending: Mutex<Option<PendingSave>>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn DocumentStore>, key: impl Into<String>, debounce: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            debounce,
            pending: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes `document` immediately, superseding any pending debounced save.
    pub async fn save(&self, document: &Document) -> Result<(), StorageError> {
        self.cancel_pending();
        write_document(self.store.as_ref(), &self.key, document).await
    }

    /// Schedules a debounced save of `document`. Must be called inside a tokio runtime.
    pub fn schedule_save(&self, document: Document) {
        let mut pending = self.pending();
        if let Some(previous) = pending.take() {
            previous.handle.abort();
        }

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let delay = self.debounce;
        let snapshot = document.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = write_document(store.as_ref(), &key, &snapshot).await {
                error!("Debounced save failed: {e}");
            }
        });

        *pending = Some(PendingSave { handle, document });
    }

    /// True while a debounced save is scheduled and has not run yet.
    #[cfg(test)]
    pub fn has_pending_save(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// Writes a not-yet-fired debounced save right away.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let pending = self.pending().take();
        match pending {
            Some(p) if !p.handle.is_finished() => {
                p.handle.abort();
                write_document(self.store.as_ref(), &self.key, &p.document).await
            }
            _ => Ok(()),
        }
    }

    /// Reads the stored document. `None` when the slot is empty or unreadable.
    pub async fn load(&self) -> Result<Option<Document>, StorageError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            debug!(key = %self.key, "No stored document");
            return Ok(None);
        };
        match serde_json::from_str::<Document>(&raw) {
            Ok(document) => {
                info!(key = %self.key, "Loaded stored document");
                Ok(Some(document))
            }
            Err(e) => {
                warn!(key = %self.key, "Ignoring unreadable stored document: {e}");
                Ok(None)
            }
        }
    }

    /// Clears the slot and drops any pending save.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.cancel_pending();
        self.store.remove(&self.key).await?;
        info!(key = %self.key, "Cleared stored document");
        Ok(())
    }

    fn cancel_pending(&self) {
        if let Some(previous) = self.pending().take() {
            previous.handle.abort();
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<PendingSave>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn write_document(
    store: &dyn DocumentStore,
    key: &str,
    document: &Document,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(document)?;
    store.set(key, json).await?;
    debug!(key, "Document saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> (Arc<InMemoryStore>, PersistenceAdapter) {
        let store = Arc::new(InMemoryStore::new());
        let adapter = PersistenceAdapter::new(store.clone(), DEFAULT_STORAGE_KEY, DEFAULT_DEBOUNCE);
        (store, adapter)
    }

    fn named(name: &str) -> Document {
        Document {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (store, adapter) = adapter();
        adapter.save(&named("Ada")).await.unwrap();
        assert_eq!(store.write_count(), 1);
        let loaded = adapter.load().await.unwrap().unwrap();
        assert_eq!(loaded.full_name, "Ada");
    }

    #[tokio::test]
    async fn test_load_empty_slot_is_absent() {
        let (_store, adapter) = adapter();
        assert!(adapter.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_tolerates_partial_document() {
        let (store, adapter) = adapter();
        store
            .set(DEFAULT_STORAGE_KEY, r#"{"jobTitle":"Engineer","extra":1}"#.to_string())
            .await
            .unwrap();
        let loaded = adapter.load().await.unwrap().unwrap();
        assert_eq!(loaded.job_title, "Engineer");
        assert_eq!(loaded.full_name, "");
    }

    #[tokio::test]
    async fn test_load_unreadable_document_is_absent() {
        let (store, adapter) = adapter();
        store
            .set(DEFAULT_STORAGE_KEY, "not json".to_string())
            .await
            .unwrap();
        assert!(adapter.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_slot() {
        let (store, adapter) = adapter();
        adapter.save(&named("Ada")).await.unwrap();
        adapter.reset().await.unwrap();
        assert!(store.get(DEFAULT_STORAGE_KEY).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_writes_once_with_last_state() {
        let (store, adapter) = adapter();
        for name in ["A", "Ad", "Ada", "Ada L", "Ada Lovelace"] {
            adapter.schedule_save(named(name));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(store.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count(), 1);
        let loaded = adapter.load().await.unwrap().unwrap();
        assert_eq!(loaded.full_name, "Ada Lovelace");
        assert!(!adapter.has_pending_save());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_separated_by_quiet_window_write_twice() {
        let (store, adapter) = adapter();
        adapter.schedule_save(named("first"));
        tokio::time::sleep(Duration::from_millis(350)).await;
        adapter.schedule_save(named("second"));
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_pending_immediately() {
        let (store, adapter) = adapter();
        adapter.schedule_save(named("pending"));
        assert!(adapter.has_pending_save());
        adapter.flush().await.unwrap();
        assert_eq!(store.write_count(), 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_save_supersedes_pending() {
        let (store, adapter) = adapter();
        adapter.schedule_save(named("stale"));
        adapter.save(&named("fresh")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count(), 1);
        assert_eq!(adapter.load().await.unwrap().unwrap().full_name, "fresh");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_drops_pending_save() {
        let (store, adapter) = adapter();
        adapter.schedule_save(named("doomed"));
        adapter.reset().await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(store.write_count(), 0);
        assert!(adapter.load().await.unwrap().is_none());
    }
}
