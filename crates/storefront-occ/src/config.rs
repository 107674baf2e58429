//! OCC and feature configuration
//!
//! Both sections deserialize from the storefront TOML file; every field has
//! a default so an empty section is valid.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default endpoint templates
///
/// `${name}` placeholders are filled from url params when building a URL.
pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
    ("page", "cms/pages/${id}"),
    ("pages", "cms/pages"),
    ("userPage", "users/${userId}/cms/pages/${id}"),
    ("userPages", "users/${userId}/cms/pages"),
];

/// OCC backend location and endpoint templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccConfig {
    /// Scheme and host, e.g. `https://localhost:9002`
    pub base_url: String,
    /// API prefix, e.g. `/occ/v2/`
    pub prefix: String,
    /// Base site id inserted after the prefix
    pub base_site: String,
    /// Endpoint template overrides by name
    pub endpoints: BTreeMap<String, String>,
}

impl OccConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With backend base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With base site
    #[inline]
    #[must_use]
    pub fn with_base_site(mut self, base_site: impl Into<String>) -> Self {
        self.base_site = base_site.into();
        self
    }

    /// With an endpoint template override
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.endpoints.insert(name.into(), template.into());
        self
    }

    /// Template for an endpoint: configured override, then built-in default
    #[must_use]
    pub fn endpoint_template(&self, name: &str) -> Option<&str> {
        self.endpoints.get(name).map(String::as_str).or_else(|| {
            DEFAULT_ENDPOINTS
                .iter()
                .find(|(default_name, _)| *default_name == name)
                .map(|(_, template)| *template)
        })
    }
}

impl Default for OccConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:9002".to_string(),
            prefix: "/occ/v2/".to_string(),
            base_site: "electronics-spa".to_string(),
            endpoints: BTreeMap::new(),
        }
    }
}

/// Value of a single feature toggle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureToggle {
    /// Explicitly on or off
    Enabled(bool),
    /// On from the given feature level (`"major.minor"`)
    Level(String),
}

/// Feature flags and feature level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Feature level, `"*"` enables every level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Named toggles
    #[serde(flatten)]
    pub flags: BTreeMap<String, FeatureToggle>,
}

impl FeaturesConfig {
    /// Create empty configuration (every flag off)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a boolean flag
    #[inline]
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(name.into(), FeatureToggle::Enabled(enabled));
        self
    }

    /// With the feature level
    #[inline]
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}
