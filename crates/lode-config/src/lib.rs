//! # lode-config
//!
//! Layered configuration loading for Lodestar using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LODESTAR_*` prefix, `__` as separator)
//! 2. Project-level `.lodestar/config.toml`
//! 3. User-level `~/.config/lodestar/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `LODESTAR_RETRIEVAL__API_KEY` -> `retrieval.api_key`,
//! `LODESTAR_PIPELINE__ESCALATION_BUDGET` -> `pipeline.escalation_budget`, etc.
//!
//! ```no_run
//! use lode_config::LodeConfig;
//!
//! let config = LodeConfig::load_with_dotenv().expect("config");
//! assert!(config.pipeline.escalation_budget <= 5);
//! ```

mod cache;
mod error;
mod pipeline;
mod retrieval;
mod sanity;
mod store;

pub use cache::{CacheConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use error::ConfigError;
pub use pipeline::PipelineConfig;
pub use retrieval::RetrievalConfig;
pub use sanity::SanityConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hard ceiling on the escalation budget; larger values are a config mistake.
pub const MAX_ESCALATION_BUDGET: u32 = 5;

/// Longest accepted cache TTL: ten years.
pub const MAX_CACHE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LodeConfig {
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sanity: SanityConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl LodeConfig {
    /// Load and validate configuration from TOML files and environment.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provider fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a provider fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests and the CLI can merge extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".lodestar/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("LODESTAR_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lodestar").join("config.toml"))
    }

    /// Check cross-field ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: String| ConfigError::InvalidValue {
            field: field.to_string(),
            reason,
        };

        if self.retrieval.timeout_secs == 0 {
            return Err(invalid("retrieval.timeout_secs", "must be at least 1".into()));
        }
        if self.pipeline.escalation_budget > MAX_ESCALATION_BUDGET {
            return Err(invalid(
                "pipeline.escalation_budget",
                format!("must be at most {MAX_ESCALATION_BUDGET}"),
            ));
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(invalid(
                "cache.ttl_secs",
                format!("must be at most {MAX_CACHE_TTL_SECS}"),
            ));
        }
        if self.cache.max_payload_bytes == 0 {
            return Err(invalid("cache.max_payload_bytes", "must be positive".into()));
        }
        let sanity = &self.sanity;
        if !(sanity.split_tolerance >= 0.0 && sanity.split_tolerance < 1.0) {
            return Err(invalid(
                "sanity.split_tolerance",
                format!("{} is not in [0, 1)", sanity.split_tolerance),
            ));
        }
        if !(sanity.revenue_multiple_min > 0.0
            && sanity.revenue_multiple_min <= sanity.revenue_multiple_max)
        {
            return Err(invalid(
                "sanity.revenue_multiple_min",
                format!(
                    "expected 0 < min <= max, got {}..{}",
                    sanity.revenue_multiple_min, sanity.revenue_multiple_max
                ),
            ));
        }
        if sanity.forecast_tolerance < 0.0 {
            return Err(invalid(
                "sanity.forecast_tolerance",
                "must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Return the retrieval section, or an error naming the missing field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Incomplete`] when endpoint or API key is empty.
    pub fn require_retrieval(&self) -> Result<&RetrievalConfig, ConfigError> {
        if self.retrieval.endpoint.is_empty() {
            return Err(ConfigError::Incomplete {
                section: "retrieval",
                field: "endpoint",
            });
        }
        if self.retrieval.api_key.is_empty() {
            return Err(ConfigError::Incomplete {
                section: "retrieval",
                field: "api_key",
            });
        }
        Ok(&self.retrieval)
    }
}
