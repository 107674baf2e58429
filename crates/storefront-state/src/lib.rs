//! Storefront State - reactive client state with storage persistence
//!
//! Provides:
//! - [`Store`]: a single-value state container with ordered change delivery
//! - [`Subscription`]: composite, cancellable teardown handle
//! - [`StatePersistence`]: mirrors a state stream into a storage backend and
//!   replays stored snapshots on read
//! - [`consents`]: the anonymous-consents slice and its persistence
//!   synchronizer
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_state::prelude::*;
//!
//! # async fn example() {
//! let store = Store::new(AnonymousConsentsState::default());
//! let service = Arc::new(AnonymousConsentsService::new(store.clone()));
//! let persistence = StatePersistence::in_memory();
//!
//! let mut sync = AnonymousConsentsStatePersistence::new(persistence, store, service);
//! sync.init_sync();
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod consents;
pub mod error;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod subscription;

pub use consents::{
    AnonymousConsent, AnonymousConsentsFacade, AnonymousConsentsService,
    AnonymousConsentsState, AnonymousConsentsStatePersistence, AnonymousConsentsUi,
    ConsentState, ConsentTemplate, LoaderState, SyncedAnonymousConsentsState,
    ANONYMOUS_CONSENTS_STORAGE_KEY,
};
pub use error::StorageError;
pub use persistence::{StatePersistence, StorageSyncType, SyncOptions, DEFAULT_KEY_PREFIX};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
pub use store::Store;
pub use subscription::Subscription;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for wiring state persistence
    pub use crate::{
        AnonymousConsentsService, AnonymousConsentsState, AnonymousConsentsStatePersistence,
        StatePersistence, StorageSyncType, Store, Subscription, SyncOptions,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
