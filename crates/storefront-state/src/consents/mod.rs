//! Anonymous consents slice
//!
//! Consents a visitor gives before logging in, the templates they refer to,
//! and the banner UI flags. The slice is kept in browser-style storage by
//! [`AnonymousConsentsStatePersistence`].

pub mod model;
pub mod persistence;
pub mod service;
pub mod updates;

pub use model::{
    AnonymousConsent, AnonymousConsentsState, AnonymousConsentsUi, ConsentState,
    ConsentTemplate, LoaderState, SyncedAnonymousConsentsState,
};
pub use persistence::{AnonymousConsentsStatePersistence, ANONYMOUS_CONSENTS_STORAGE_KEY};
pub use service::{AnonymousConsentsFacade, AnonymousConsentsService};
