//! Anonymous consents storage synchronizer
//!
//! Keeps the anonymous consents slice mirrored into storage under
//! [`ANONYMOUS_CONSENTS_STORAGE_KEY`] and replays the stored snapshot into
//! the live state when storage is read.

use super::model::{AnonymousConsentsState, SyncedAnonymousConsentsState};
use super::service::AnonymousConsentsFacade;
use super::updates;
use crate::persistence::{StatePersistence, StorageSyncType, SyncOptions};
use crate::store::Store;
use crate::subscription::Subscription;
use std::fmt;
use std::sync::Arc;

/// Storage key of the anonymous consents slice
pub const ANONYMOUS_CONSENTS_STORAGE_KEY: &str = "anonymous-consents";

/// Synchronizes anonymous consents state with storage
///
/// Owns one [`Subscription`] for its whole life. [`Self::dispose`] (or
/// dropping the synchronizer) releases it exactly once.
pub struct AnonymousConsentsStatePersistence {
    state_persistence: StatePersistence,
    store: Store<AnonymousConsentsState>,
    consents: Arc<dyn AnonymousConsentsFacade>,
    storage_type: StorageSyncType,
    subscription: Subscription,
}

impl AnonymousConsentsStatePersistence {
    /// Create synchronizer; nothing is registered until [`Self::init_sync`]
    #[must_use]
    pub fn new(
        state_persistence: StatePersistence,
        store: Store<AnonymousConsentsState>,
        consents: Arc<dyn AnonymousConsentsFacade>,
    ) -> Self {
        Self {
            state_persistence,
            store,
            consents,
            storage_type: StorageSyncType::LocalStorage,
            subscription: Subscription::new(),
        }
    }

    /// Persist to a different backend
    #[inline]
    #[must_use]
    pub fn with_storage_type(mut self, storage_type: StorageSyncType) -> Self {
        self.storage_type = storage_type;
        self
    }

    /// Start syncing state and storage
    ///
    /// The stored snapshot is replayed (see [`Self::on_read`]) before this
    /// returns. Must be called from within a tokio runtime.
    pub fn init_sync(&mut self) {
        let store = self.store.clone();
        let consents = Arc::clone(&self.consents);
        let options = SyncOptions::new(ANONYMOUS_CONSENTS_STORAGE_KEY, self.synced_state())
            .with_storage_type(self.storage_type);

        let registration = self.state_persistence.sync_with_storage(options, move |snapshot| {
            apply_snapshot(&store, consents.as_ref(), snapshot);
        });
        self.subscription.add(registration);
    }

    /// Replay a stored snapshot into the live state
    pub fn on_read(&self, snapshot: Option<SyncedAnonymousConsentsState>) {
        apply_snapshot(&self.store, self.consents.as_ref(), snapshot);
    }

    /// Release the storage registration
    pub fn dispose(&mut self) {
        self.subscription.unsubscribe();
    }

    /// Whether the synchronizer was disposed
    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.subscription.is_closed()
    }

    fn synced_state(&self) -> futures::stream::BoxStream<'static, SyncedAnonymousConsentsState> {
        self.store.select(|state| SyncedAnonymousConsentsState::from(state))
    }
}

impl fmt::Debug for AnonymousConsentsStatePersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnonymousConsentsStatePersistence")
            .field("storage_type", &self.storage_type)
            .field("subscription", &self.subscription)
            .finish_non_exhaustive()
    }
}

fn apply_snapshot(
    store: &Store<AnonymousConsentsState>,
    consents: &dyn AnonymousConsentsFacade,
    snapshot: Option<SyncedAnonymousConsentsState>,
) {
    let Some(snapshot) = snapshot else {
        return;
    };

    if let Some(templates) = snapshot.templates.filter(|t| t.success) {
        let value = templates.value.unwrap_or_default();
        tracing::debug!(count = value.len(), "Restoring consent templates");
        store.update(|s| updates::load_templates_success(s, value));
    }

    if let Some(stored) = snapshot.consents {
        consents.set_consents(stored);
    }

    if let Some(ui) = snapshot.ui {
        consents.toggle_banner_dismissed(ui.banner_dismissed);
        consents.toggle_templates_updated(ui.updated);
    }
}
