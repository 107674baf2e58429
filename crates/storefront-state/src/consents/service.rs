//! Anonymous consents facade

use super::model::{AnonymousConsent, AnonymousConsentsState, ConsentState, ConsentTemplate};
use super::updates;
use crate::store::Store;

/// Consent and banner mutations used when replaying stored snapshots
#[cfg_attr(test, mockall::automock)]
pub trait AnonymousConsentsFacade: Send + Sync {
    /// Replace all consents
    fn set_consents(&self, consents: Vec<AnonymousConsent>);

    /// Set the banner-dismissed flag
    fn toggle_banner_dismissed(&self, dismissed: bool);

    /// Set the templates-updated flag
    fn toggle_templates_updated(&self, updated: bool);
}

/// Store-backed anonymous consents service
#[derive(Debug, Clone)]
pub struct AnonymousConsentsService {
    store: Store<AnonymousConsentsState>,
}

impl AnonymousConsentsService {
    /// Service over a shared store
    #[inline]
    #[must_use]
    pub fn new(store: Store<AnonymousConsentsState>) -> Self {
        Self { store }
    }

    /// Loaded templates, empty until loaded
    #[must_use]
    pub fn get_templates(&self) -> Vec<ConsentTemplate> {
        self.store
            .read(|s| s.templates.value.clone().unwrap_or_default())
    }

    /// Record loaded templates and add undecided consents for new ones
    pub fn load_templates(&self, templates: Vec<ConsentTemplate>) {
        self.store.update(|s| {
            updates::load_templates_success(s, templates);
            updates::initialize_consents(s);
        });
    }

    /// All consents
    #[must_use]
    pub fn get_consents(&self) -> Vec<AnonymousConsent> {
        self.store.read(|s| s.consents.clone())
    }

    /// Consent for a template
    #[must_use]
    pub fn get_consent(&self, template_code: &str) -> Option<AnonymousConsent> {
        self.store.read(|s| {
            s.consents
                .iter()
                .find(|c| c.template_code.as_deref() == Some(template_code))
                .cloned()
        })
    }

    /// Give consent for a template
    pub fn give_consent(&self, template_code: &str) {
        self.store.update(|s| updates::give_consent(s, template_code));
    }

    /// Withdraw consent for a template
    pub fn withdraw_consent(&self, template_code: &str) {
        self.store.update(|s| updates::withdraw_consent(s, template_code));
    }

    /// Whether the consent for a template was given
    #[must_use]
    pub fn is_consent_given(&self, template_code: &str) -> bool {
        self.get_consent(template_code)
            .is_some_and(|c| c.is(ConsentState::Given))
    }

    /// Whether the consent for a template was withdrawn
    #[must_use]
    pub fn is_consent_withdrawn(&self, template_code: &str) -> bool {
        self.get_consent(template_code)
            .is_some_and(|c| c.is(ConsentState::Withdrawn))
    }

    /// Banner-dismissed flag
    #[must_use]
    pub fn is_banner_dismissed(&self) -> bool {
        self.store.read(|s| s.ui.banner_dismissed)
    }

    /// Templates-updated flag
    #[must_use]
    pub fn get_templates_updated(&self) -> bool {
        self.store.read(|s| s.ui.updated)
    }

    /// Banner is shown until dismissed, and again after templates change
    #[must_use]
    pub fn is_banner_visible(&self) -> bool {
        self.store.read(|s| !s.ui.banner_dismissed || s.ui.updated)
    }
}

impl AnonymousConsentsFacade for AnonymousConsentsService {
    fn set_consents(&self, consents: Vec<AnonymousConsent>) {
        self.store.update(|s| updates::set_consents(s, consents));
    }

    fn toggle_banner_dismissed(&self, dismissed: bool) {
        self.store.update(|s| updates::toggle_banner_dismissed(s, dismissed));
    }

    fn toggle_templates_updated(&self, updated: bool) {
        self.store.update(|s| updates::toggle_templates_updated(s, updated));
    }
}
