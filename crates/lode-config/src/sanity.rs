//! Numeric plausibility thresholds.

use serde::{Deserialize, Serialize};

const fn default_split_tolerance() -> f64 {
    0.02
}

const fn default_revenue_multiple_min() -> f64 {
    5.0
}

const fn default_revenue_multiple_max() -> f64 {
    8.0
}

/// US orphan-drug prevalence ceiling.
const fn default_orphan_threshold() -> f64 {
    200_000.0
}

fn default_strength_sentinels() -> Vec<f64> {
    vec![7.5]
}

const fn default_forecast_tolerance() -> f64 {
    0.10
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SanityConfig {
    /// Allowed deviation of the geographic split total from 1.
    #[serde(default = "default_split_tolerance")]
    pub split_tolerance: f64,

    /// Lower bound of total / peak revenue.
    #[serde(default = "default_revenue_multiple_min")]
    pub revenue_multiple_min: f64,

    /// Upper bound of total / peak revenue.
    #[serde(default = "default_revenue_multiple_max")]
    pub revenue_multiple_max: f64,

    /// Patient count above which orphan designation is implausible.
    #[serde(default = "default_orphan_threshold")]
    pub orphan_threshold: f64,

    /// Scores the retrieval service emits when it has no real assessment.
    #[serde(default = "default_strength_sentinels")]
    pub strength_sentinels: Vec<f64>,

    /// Allowed relative gap between the yearly forecast sum and total revenue.
    #[serde(default = "default_forecast_tolerance")]
    pub forecast_tolerance: f64,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            split_tolerance: default_split_tolerance(),
            revenue_multiple_min: default_revenue_multiple_min(),
            revenue_multiple_max: default_revenue_multiple_max(),
            orphan_threshold: default_orphan_threshold(),
            strength_sentinels: default_strength_sentinels(),
            forecast_tolerance: default_forecast_tolerance(),
        }
    }
}
