//! `storefront.toml` loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storefront_occ::{FeaturesConfig, OccConfig};
use storefront_state::DEFAULT_KEY_PREFIX;

/// Config file used when `--config` is not given
pub(crate) const DEFAULT_CONFIG_FILE: &str = "storefront.toml";

pub(crate) const ENV_OCC_BASE_URL: &str = "STOREFRONT_OCC_BASE_URL";
pub(crate) const ENV_BASE_SITE: &str = "STOREFRONT_BASE_SITE";

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where persisted state lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorageConfig {
    pub(crate) path: PathBuf,
    pub(crate) prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("storefront-storage.json"),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorefrontConfig {
    pub(crate) occ: OccConfig,
    pub(crate) features: FeaturesConfig,
    pub(crate) storage: StorageConfig,
}

impl StorefrontConfig {
    /// Load `path`; a missing default file gives the defaults
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                tracing::debug!("No config file, using defaults");
                Self::default()
            }
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override OCC location from the environment
    pub(crate) fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_OCC_BASE_URL) {
            self.occ.base_url = base_url;
        }
        if let Some(base_site) = lookup(ENV_BASE_SITE) {
            self.occ.base_site = base_site;
        }
    }
}
