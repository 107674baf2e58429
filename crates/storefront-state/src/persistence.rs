//! State persistence synchronization
//!
//! [`StatePersistence::sync_with_storage`] mirrors a state stream into a
//! storage backend and hands stored snapshots back to the caller:
//! - the stored value is read (and `on_read` called) before anything is written
//! - every state emission is written under the key of the current context
//! - a context change reads the new context's key and calls `on_read` again

use crate::storage::{MemoryStorage, StorageBackend};
use crate::subscription::Subscription;
use futures::stream::{BoxStream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Default namespace for storage keys
pub const DEFAULT_KEY_PREFIX: &str = "storefront";

/// Separator between key segments
pub const KEY_SEPARATOR: &str = "⚿";

/// Which backend a synced slice goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageSyncType {
    /// Survives restarts
    #[default]
    LocalStorage,
    /// Lives as long as the process
    SessionStorage,
    /// Never read, never written
    NoStorage,
}

/// Registration parameters for [`StatePersistence::sync_with_storage`]
pub struct SyncOptions<T> {
    /// Storage key of the synced concern
    pub key: String,
    /// State to persist; every item is written
    pub state: BoxStream<'static, T>,
    /// Context segments (e.g. base site); `None` means an empty context
    pub context: Option<watch::Receiver<Vec<String>>>,
    /// Target backend
    pub storage_type: StorageSyncType,
}

impl<T> SyncOptions<T> {
    /// Options for `key` with an empty context and local storage
    #[must_use]
    pub fn new(key: impl Into<String>, state: BoxStream<'static, T>) -> Self {
        Self {
            key: key.into(),
            state,
            context: None,
            storage_type: StorageSyncType::default(),
        }
    }

    /// Follow a changing context
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: watch::Receiver<Vec<String>>) -> Self {
        self.context = Some(context);
        self
    }

    /// Select the backend
    #[inline]
    #[must_use]
    pub fn with_storage_type(mut self, storage_type: StorageSyncType) -> Self {
        self.storage_type = storage_type;
        self
    }
}

impl<T> fmt::Debug for SyncOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("key", &self.key)
            .field("has_context", &self.context.is_some())
            .field("storage_type", &self.storage_type)
            .finish_non_exhaustive()
    }
}

/// Storage-sync registrar
#[derive(Debug, Clone)]
pub struct StatePersistence {
    prefix: String,
    local: Arc<dyn StorageBackend>,
    session: Arc<dyn StorageBackend>,
}

impl StatePersistence {
    /// Registrar over explicit local and session backends
    #[must_use]
    pub fn new(local: Arc<dyn StorageBackend>, session: Arc<dyn StorageBackend>) -> Self {
        Self {
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            local,
            session,
        }
    }

    /// Registrar where both backends are in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    /// Override the key namespace
    #[inline]
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Backend for a sync type
    #[must_use]
    pub fn storage(&self, storage_type: StorageSyncType) -> Option<Arc<dyn StorageBackend>> {
        match storage_type {
            StorageSyncType::LocalStorage => Some(Arc::clone(&self.local)),
            StorageSyncType::SessionStorage => Some(Arc::clone(&self.session)),
            StorageSyncType::NoStorage => None,
        }
    }

    /// Full storage key: `{prefix}⚿{context...}⚿{key}`
    #[must_use]
    pub fn key_with_context(&self, context: &[String], key: &str) -> String {
        key_with_context(&self.prefix, context, key)
    }

    /// Read a stored snapshot directly
    #[must_use]
    pub fn read<T: DeserializeOwned>(
        &self,
        storage_type: StorageSyncType,
        context: &[String],
        key: &str,
    ) -> Option<T> {
        read_from_storage(
            self.storage(storage_type).as_deref(),
            &self.key_with_context(context, key),
        )
    }

    /// Mirror `options.state` into storage and report stored snapshots
    ///
    /// `on_read` is called synchronously with the snapshot of the current
    /// context before this returns, and again after every context change.
    /// Absent or undecodable snapshots are reported as `None`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn sync_with_storage<T, F>(&self, options: SyncOptions<T>, mut on_read: F) -> Subscription
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnMut(Option<T>) + Send + 'static,
    {
        let SyncOptions {
            key,
            mut state,
            context: mut context_rx,
            storage_type,
        } = options;
        let storage = self.storage(storage_type);
        let prefix = self.prefix.clone();

        let mut context = context_rx
            .as_mut()
            .map(|rx| rx.borrow_and_update().clone())
            .unwrap_or_default();

        tracing::debug!(key = %key, ?storage_type, "Registering storage sync");
        on_read(read_from_storage(
            storage.as_deref(),
            &key_with_context(&prefix, &context, &key),
        ));

        let task = tokio::spawn(async move {
            loop {
                // context first, so a switch reads before the next write
                let event = tokio::select! {
                    biased;
                    changed = next_context(&mut context_rx) => SyncEvent::Context(changed),
                    next = state.next() => SyncEvent::State(next),
                };

                match event {
                    SyncEvent::Context(Some(changed)) => {
                        context = changed;
                        let storage_key = key_with_context(&prefix, &context, &key);
                        tracing::debug!(key = %storage_key, "Storage context changed");
                        on_read(read_from_storage(storage.as_deref(), &storage_key));
                    }
                    SyncEvent::Context(None) => context_rx = None,
                    SyncEvent::State(Some(value)) => {
                        let storage_key = key_with_context(&prefix, &context, &key);
                        persist_to_storage(storage.as_ref(), storage_key, value).await;
                    }
                    SyncEvent::State(None) => break,
                }
            }
            tracing::debug!(key = %key, "State stream ended, storage sync stopped");
        });

        Subscription::from_task(task)
    }
}

impl Default for StatePersistence {
    fn default() -> Self {
        Self::in_memory()
    }
}

enum SyncEvent<T> {
    Context(Option<Vec<String>>),
    State(Option<T>),
}

/// Next context value; pends forever without a context source
async fn next_context(rx: &mut Option<watch::Receiver<Vec<String>>>) -> Option<Vec<String>> {
    match rx {
        Some(rx) => match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => None,
        },
        None => std::future::pending().await,
    }
}

fn key_with_context(prefix: &str, context: &[String], key: &str) -> String {
    let mut full = String::from(prefix);
    full.push_str(KEY_SEPARATOR);
    full.push_str(&context.join(KEY_SEPARATOR));
    full.push_str(KEY_SEPARATOR);
    full.push_str(key);
    full
}

fn read_from_storage<T: DeserializeOwned>(
    storage: Option<&dyn StorageBackend>,
    key: &str,
) -> Option<T> {
    let storage = storage?;
    let text = match storage.get_item(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read from storage");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Ignoring malformed stored state");
            None
        }
    }
}

/// Encode on the sync task, write on the blocking pool
///
/// Awaited in place, so writes for one key land in emission order.
async fn persist_to_storage<T: Serialize>(
    storage: Option<&Arc<dyn StorageBackend>>,
    key: String,
    value: T,
) {
    let Some(storage) = storage else {
        return;
    };

    let text = match serde_json::to_string(&value) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to encode state");
            return;
        }
    };

    let storage = Arc::clone(storage);
    let write_key = key.clone();
    match tokio::task::spawn_blocking(move || storage.set_item(&write_key, &text)).await {
        Ok(Ok(())) => tracing::trace!(key = %key, "Persisted state"),
        Ok(Err(e)) => tracing::warn!(key = %key, error = %e, "Failed to persist state"),
        Err(e) => tracing::warn!(key = %key, error = %e, "Storage write task failed"),
    }
}
