//! Commons configuration.
//!
//! Settings are merged from, lowest priority first:
//! 1. Built-in defaults
//! 2. `~/.commons/config.yml`
//! 3. `COMMONS_*` environment variables, with `__` between nested keys
//!    (`COMMONS_RESOURCES__NO_DEFAULTS=true` sets `resources.no_defaults`)
//!
//! [`CommonsConfig::global`] is what the library itself consults: the
//! default resource roots and the charset of properties resources come
//! from it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use commons_core::config::CommonsConfig;
//!
//! let config = CommonsConfig::load()?;
//! config.init_logging()?;
//! let resources = config.resource_loader();
//! # Ok::<(), commons_types::CommonsError>(())
//! ```

use crate::resource::ResourceDirs;
use crate::util::fs::create_dir;
use commons_types::{CommonsError, LogConfig, ResourcesConfig, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding the file.
pub const ENV_PREFIX: &str = "COMMONS_";

static GLOBAL: Lazy<CommonsConfig> = Lazy::new(|| match CommonsConfig::load() {
    Ok(config) => config,
    Err(e) => {
        tracing::warn!("Using default configuration: {}", e);
        CommonsConfig::default()
    }
});

fn default_charset() -> String {
    "UTF-8".to_string()
}

/// Typed commons configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonsConfig {
    /// Resource lookup
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Charset of properties resources
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Log outputs
    #[serde(default)]
    pub logs: Vec<LogConfig>,
}

impl Default for CommonsConfig {
    fn default() -> Self {
        Self {
            resources: ResourcesConfig::default(),
            charset: default_charset(),
            logs: Vec::new(),
        }
    }
}

impl CommonsConfig {
    /// Process-wide configuration, loaded from the default location on
    /// first use. A file that fails to load is logged and replaced by the
    /// defaults.
    pub fn global() -> &'static CommonsConfig {
        &GLOBAL
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from `path`, with `COMMONS_*` overrides.
    ///
    /// A missing file is not an error; the defaults apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(path.as_ref(), ENV_PREFIX)
    }

    fn extract(path: &Path, env_prefix: &str) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(env_prefix).split("__"))
            .extract()
            .map_err(|e| {
                CommonsError::Config(format!("Failed to load {}: {}", path.display(), e))
            })?;
        tracing::debug!(path = %path.display(), "Loaded commons configuration");
        Ok(config)
    }

    /// Write this configuration to `path` as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }
        fs::write(path, yaml)?;
        Ok(())
    }

    /// `~/.commons/config.yml`, or `./.commons/config.yml` without a home.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".commons")
            .join("config.yml")
    }

    /// Resource loader over the configured roots.
    pub fn resource_loader(&self) -> ResourceDirs {
        ResourceDirs::from_config(&self.resources)
    }

    /// Install the configured log outputs.
    pub fn init_logging(&self) -> Result<()> {
        crate::log::init_from_config(&self.logs)
    }
}
