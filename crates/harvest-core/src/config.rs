use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::FurnitureLexicon;
use crate::network::FetchConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

pub const ENV_TIMEOUT: &str = "HARVEST_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "HARVEST_USER_AGENT";
pub const ENV_SIMILARITY_THRESHOLD: &str = "HARVEST_SIMILARITY_THRESHOLD";
pub const ENV_SENSE_INVENTORY: &str = "HARVEST_SENSE_INVENTORY";

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub fetch: FetchConfig,
    /// Minimum similarity at which two names are treated as one product
    pub similarity_threshold: f64,
    /// Capacity of each memo cache (tokenization, membership, normalization)
    pub cache_capacity: usize,
    /// Category every product name must belong to
    pub category: String,
    /// Property keywords that vouch for an unrecognised name
    pub lexicon: Vec<String>,
    /// Sense inventory to load instead of the bundled one
    pub sense_inventory: Option<PathBuf>,
    /// Apply the category check on top of the structural rules
    pub semantic_validation: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            similarity_threshold: 0.8,
            cache_capacity: 1000,
            category: "furniture".to_string(),
            lexicon: FurnitureLexicon::default_keywords(),
            sense_inventory: None,
            semantic_validation: true,
        }
    }
}

impl HarvestConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        if let Some(value) = lookup(ENV_TIMEOUT) {
            self.fetch.timeout_seconds = value.trim().parse().map_err(|_| {
                ConfigError::InvalidEnv {
                    key: ENV_TIMEOUT,
                    value: value.clone(),
                }
            })?;
        }
        if let Some(value) = lookup(ENV_USER_AGENT).filter(|v| !v.trim().is_empty()) {
            self.fetch.user_agent = Some(value);
        }
        if let Some(value) = lookup(ENV_SIMILARITY_THRESHOLD) {
            self.similarity_threshold = value.trim().parse().map_err(|_| {
                ConfigError::InvalidEnv {
                    key: ENV_SIMILARITY_THRESHOLD,
                    value: value.clone(),
                }
            })?;
        }
        if let Some(value) = lookup(ENV_SENSE_INVENTORY).filter(|v| !v.trim().is_empty()) {
            self.sense_inventory = Some(PathBuf::from(value));
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be positive".into()));
        }
        if self.fetch.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_seconds must be positive".into()));
        }
        if self.category.trim().is_empty() {
            return Err(ConfigError::Invalid("category must not be empty".into()));
        }
        Ok(())
    }
}
