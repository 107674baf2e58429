//! Anonymous consents data model
//!
//! Field names follow the OCC JSON shape (camelCase) so stored snapshots stay
//! readable by other storefront clients.

use serde::{Deserialize, Serialize};

/// Consent state of a single template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentState {
    /// Visitor agreed
    Given,
    /// Visitor declined or revoked
    Withdrawn,
}

/// Consent given by a visitor who is not logged in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousConsent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consent_state: Option<ConsentState>,
}

impl AnonymousConsent {
    /// Undecided consent for a template
    #[must_use]
    pub fn for_template(template: &ConsentTemplate) -> Self {
        Self {
            template_code: Some(template.id.clone()),
            template_version: template.version,
            consent_state: None,
        }
    }

    /// Whether this consent is in the given state
    #[inline]
    #[must_use]
    pub fn is(&self, state: ConsentState) -> bool {
        self.consent_state == Some(state)
    }
}

/// Consent template served by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentTemplate {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_consent: Option<serde_json::Value>,
}

/// Load-result wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderState<T> {
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> LoaderState<T> {
    /// Successfully loaded value
    #[must_use]
    pub fn loaded(value: T) -> Self {
        Self {
            loading: false,
            error: false,
            success: true,
            value: Some(value),
        }
    }
}

impl<T> Default for LoaderState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: false,
            success: false,
            value: None,
        }
    }
}

/// Banner UI flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousConsentsUi {
    #[serde(default)]
    pub banner_dismissed: bool,
    #[serde(default)]
    pub updated: bool,
}

/// Live anonymous consents state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousConsentsState {
    #[serde(default)]
    pub templates: LoaderState<Vec<ConsentTemplate>>,
    #[serde(default)]
    pub consents: Vec<AnonymousConsent>,
    #[serde(default)]
    pub ui: AnonymousConsentsUi,
}

/// Stored snapshot of [`AnonymousConsentsState`]
///
/// Every field is optional; an absent field means "leave the live state
/// alone", not "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedAnonymousConsentsState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<LoaderState<Vec<ConsentTemplate>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consents: Option<Vec<AnonymousConsent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<AnonymousConsentsUi>,
}

impl From<&AnonymousConsentsState> for SyncedAnonymousConsentsState {
    fn from(state: &AnonymousConsentsState) -> Self {
        Self {
            templates: Some(state.templates.clone()),
            consents: Some(state.consents.clone()),
            ui: Some(state.ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snapshot_uses_camel_case() {
        let state = AnonymousConsentsState {
            ui: AnonymousConsentsUi {
                banner_dismissed: true,
                updated: false,
            },
            ..AnonymousConsentsState::default()
        };
        let json = serde_json::to_value(SyncedAnonymousConsentsState::from(&state)).unwrap();
        assert_eq!(json["ui"]["bannerDismissed"], serde_json::json!(true));
        assert_eq!(json["templates"]["success"], serde_json::json!(false));
        assert!(json["templates"].get("value").is_none());
    }

    #[test]
    fn partial_snapshot_decodes_with_absent_fields() {
        let snapshot: SyncedAnonymousConsentsState =
            serde_json::from_str(r#"{"consents": []}"#).unwrap();
        assert_eq!(snapshot.consents, Some(vec![]));
        assert!(snapshot.templates.is_none());
        assert!(snapshot.ui.is_none());
    }

    #[test]
    fn consent_state_wire_names() {
        let consent: AnonymousConsent = serde_json::from_str(
            r#"{"templateCode":"MARKETING","templateVersion":2,"consentState":"WITHDRAWN"}"#,
        )
        .unwrap();
        assert!(consent.is(ConsentState::Withdrawn));
        assert_eq!(consent.template_version, Some(2));
    }

    #[test]
    fn consent_for_template_is_undecided() {
        let template = ConsentTemplate {
            id: "PERSONALIZATION".to_string(),
            version: Some(1),
            ..ConsentTemplate::default()
        };
        let consent = AnonymousConsent::for_template(&template);
        assert_eq!(consent.template_code.as_deref(), Some("PERSONALIZATION"));
        assert!(consent.consent_state.is_none());
    }
}
