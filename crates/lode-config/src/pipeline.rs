//! Orchestrator policy values.

use serde::{Deserialize, Serialize};

const fn default_escalation_budget() -> u32 {
    2
}

const fn default_repair_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Escalated re-fetches allowed after the initial retrieval.
    #[serde(default = "default_escalation_budget")]
    pub escalation_budget: u32,

    /// Whether the heuristic repair stage runs before escalating.
    #[serde(default = "default_repair_enabled")]
    pub repair_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            escalation_budget: default_escalation_budget(),
            repair_enabled: default_repair_enabled(),
        }
    }
}

impl PipelineConfig {
    /// Upper bound on retrieval calls for one request.
    #[must_use]
    pub const fn max_retrieval_calls(&self) -> u32 {
        1 + self.escalation_budget
    }
}
