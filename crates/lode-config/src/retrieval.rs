//! Retrieval service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_max_output_tokens() -> u32 {
    16_000
}

fn default_model() -> String {
    "research-large".to_string()
}

fn default_search_context_size() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Full URL of the structured-response endpoint.
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token for the endpoint.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier; part of every request fingerprint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Hard limit on a single retrieval call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Web search context size for baseline requests (`low`, `medium`, `high`).
    #[serde(default = "default_search_context_size")]
    pub search_context_size: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: default_max_output_tokens(),
            search_context_size: default_search_context_size(),
        }
    }
}

impl RetrievalConfig {
    /// Check if the endpoint and credentials are present.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty() && !self.api_key.is_empty()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
