//! Update functions for [`AnonymousConsentsState`]
//!
//! Each function is one named transition; the store applies them through
//! [`Store::update`](crate::Store::update).

use super::model::{AnonymousConsent, AnonymousConsentsState, ConsentState, ConsentTemplate, LoaderState};

/// Templates loaded successfully
pub fn load_templates_success(state: &mut AnonymousConsentsState, templates: Vec<ConsentTemplate>) {
    state.templates = LoaderState::loaded(templates);
}

/// Replace all consents
pub fn set_consents(state: &mut AnonymousConsentsState, consents: Vec<AnonymousConsent>) {
    state.consents = consents;
}

/// Set the banner-dismissed flag
pub fn toggle_banner_dismissed(state: &mut AnonymousConsentsState, dismissed: bool) {
    state.ui.banner_dismissed = dismissed;
}

/// Set the templates-updated flag
pub fn toggle_templates_updated(state: &mut AnonymousConsentsState, updated: bool) {
    state.ui.updated = updated;
}

/// Mark the consent for `template_code` as given
pub fn give_consent(state: &mut AnonymousConsentsState, template_code: &str) {
    set_consent_state(state, template_code, ConsentState::Given);
}

/// Mark the consent for `template_code` as withdrawn
pub fn withdraw_consent(state: &mut AnonymousConsentsState, template_code: &str) {
    set_consent_state(state, template_code, ConsentState::Withdrawn);
}

/// Add an undecided consent for every loaded template that has none
pub fn initialize_consents(state: &mut AnonymousConsentsState) {
    let Some(templates) = state.templates.value.as_ref() else {
        return;
    };
    for template in templates {
        let known = state
            .consents
            .iter()
            .any(|c| c.template_code.as_deref() == Some(template.id.as_str()));
        if !known {
            state.consents.push(AnonymousConsent::for_template(template));
        }
    }
}

fn set_consent_state(state: &mut AnonymousConsentsState, template_code: &str, consent_state: ConsentState) {
    for consent in &mut state.consents {
        if consent.template_code.as_deref() == Some(template_code) {
            consent.consent_state = Some(consent_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template(id: &str) -> ConsentTemplate {
        ConsentTemplate {
            id: id.to_string(),
            version: Some(0),
            ..ConsentTemplate::default()
        }
    }

    #[test]
    fn load_templates_marks_success() {
        let mut state = AnonymousConsentsState::default();
        load_templates_success(&mut state, vec![template("MARKETING")]);
        assert!(state.templates.success);
        assert!(!state.templates.loading);
        assert_eq!(state.templates.value.unwrap().len(), 1);
    }

    #[test]
    fn ui_toggles_set_exact_values() {
        let mut state = AnonymousConsentsState::default();
        toggle_banner_dismissed(&mut state, true);
        toggle_templates_updated(&mut state, true);
        assert!(state.ui.banner_dismissed && state.ui.updated);

        toggle_banner_dismissed(&mut state, false);
        assert!(!state.ui.banner_dismissed);
        assert!(state.ui.updated);
    }

    #[test]
    fn give_and_withdraw_target_one_template() {
        let mut state = AnonymousConsentsState::default();
        load_templates_success(&mut state, vec![template("MARKETING"), template("PROFILE")]);
        initialize_consents(&mut state);
        assert_eq!(state.consents.len(), 2);

        give_consent(&mut state, "MARKETING");
        assert!(state.consents[0].is(ConsentState::Given));
        assert!(state.consents[1].consent_state.is_none());

        withdraw_consent(&mut state, "MARKETING");
        assert!(state.consents[0].is(ConsentState::Withdrawn));
    }

    #[test]
    fn initialize_keeps_existing_consents() {
        let mut state = AnonymousConsentsState::default();
        load_templates_success(&mut state, vec![template("MARKETING")]);
        set_consents(
            &mut state,
            vec![AnonymousConsent {
                template_code: Some("MARKETING".to_string()),
                template_version: Some(0),
                consent_state: Some(ConsentState::Given),
            }],
        );

        initialize_consents(&mut state);
        assert_eq!(state.consents.len(), 1);
        assert!(state.consents[0].is(ConsentState::Given));
    }
}
