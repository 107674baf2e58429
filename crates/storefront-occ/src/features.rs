//! Runtime feature flags

use crate::config::{FeatureToggle, FeaturesConfig};
use parking_lot::RwLock;
use std::sync::Arc;

/// Switches CMS page requests to the user-scoped endpoints
pub const USER_CMS_ENDPOINTS: &str = "userCmsEndpoints";

/// Shared, runtime-adjustable feature flags
///
/// Clones share the same flags.
#[derive(Debug, Clone, Default)]
pub struct FeatureConfigService {
    config: Arc<RwLock<FeaturesConfig>>,
}

impl FeatureConfigService {
    /// Service over a configuration
    #[must_use]
    pub fn new(config: FeaturesConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Whether a feature is enabled
    ///
    /// A leading `!` negates the result. Level-valued toggles are enabled
    /// once the configured feature level reaches them. Unknown flags are off.
    #[must_use]
    pub fn is_enabled(&self, feature: &str) -> bool {
        let (negated, name) = match feature.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, feature),
        };

        let config = self.config.read();
        let enabled = match config.flags.get(name) {
            Some(FeatureToggle::Enabled(enabled)) => *enabled,
            Some(FeatureToggle::Level(level)) => level_reached(config.level.as_deref(), level),
            None => false,
        };
        enabled != negated
    }

    /// Whether the configured feature level is at least `version`
    #[must_use]
    pub fn is_level(&self, version: &str) -> bool {
        level_reached(self.config.read().level.as_deref(), version)
    }

    /// Turn a flag on or off
    pub fn set_flag(&self, feature: impl Into<String>, enabled: bool) {
        self.config
            .write()
            .flags
            .insert(feature.into(), FeatureToggle::Enabled(enabled));
    }
}

fn level_reached(configured: Option<&str>, required: &str) -> bool {
    match configured {
        Some("*") => true,
        Some(level) => parse_level(level) >= parse_level(required),
        None => false,
    }
}

fn parse_level(level: &str) -> Vec<u32> {
    let mut parts: Vec<u32> = level
        .split('.')
        .map(|part| part.trim().parse().unwrap_or(0))
        .collect();
    while parts.len() > 1 && parts.last() == Some(&0) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_is_off() {
        let features = FeatureConfigService::default();
        assert!(!features.is_enabled(USER_CMS_ENDPOINTS));
        assert!(features.is_enabled("!userCmsEndpoints"));
    }

    #[test]
    fn boolean_flag() {
        let features = FeatureConfigService::new(FeaturesConfig::new().with_flag(USER_CMS_ENDPOINTS, true));
        assert!(features.is_enabled(USER_CMS_ENDPOINTS));
        assert!(!features.is_enabled("!userCmsEndpoints"));
    }

    #[test]
    fn set_flag_is_shared_by_clones() {
        let features = FeatureConfigService::default();
        let other = features.clone();
        other.set_flag(USER_CMS_ENDPOINTS, true);
        assert!(features.is_enabled(USER_CMS_ENDPOINTS));
    }

    #[test]
    fn level_comparison() {
        let features = FeatureConfigService::new(FeaturesConfig::new().with_level("6.3"));
        assert!(features.is_level("6.3"));
        assert!(features.is_level("6.3.0"));
        assert!(features.is_level("5.10"));
        assert!(!features.is_level("6.4"));
        assert!(!features.is_level("10.0"));
    }

    #[test]
    fn wildcard_level_enables_everything() {
        let features = FeatureConfigService::new(FeaturesConfig::new().with_level("*"));
        assert!(features.is_level("99.9"));
    }

    #[test]
    fn level_valued_flag() {
        let mut config = FeaturesConfig::new().with_level("6.2");
        config
            .flags
            .insert("newFocus".to_string(), FeatureToggle::Level("6.3".to_string()));
        config
            .flags
            .insert("oldFocus".to_string(), FeatureToggle::Level("6.0".to_string()));

        let features = FeatureConfigService::new(config);
        assert!(!features.is_enabled("newFocus"));
        assert!(features.is_enabled("oldFocus"));
    }
}
