use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Metrics computed from validated facts. Built once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DerivedFacts {
    /// Compound annual growth rate from current to peak revenue.
    pub growth_rate: f64,
    /// Treated patients at peak.
    pub peak_population: f64,
    /// Share of the pipeline in the same category, in percent.
    pub pipeline_density: f64,
    /// Cosine similarity between target and benchmark profiles.
    pub similarity_score: f64,
}
