//! Canonical payloads for tests across the workspace.
//!
//! Enabled with the `fixtures` feature; downstream crates turn it on in
//! `[dev-dependencies]`.

use serde_json::{Value, json};

use crate::enums::{DevelopmentStage, Geography};
use crate::facts::RawFacts;
use crate::request::RequestSpec;

/// The Oncology / X / Y / Global / Phase 3 request used in scenario tests.
///
/// # Panics
///
/// Never in practice; the literal fields are non-empty.
#[must_use]
pub fn sample_request() -> RequestSpec {
    RequestSpec::new(
        "Oncology",
        "X",
        "Y",
        Geography::Global,
        DevelopmentStage::Phase3,
        false,
    )
    .expect("fixture request is valid")
}

/// A payload that passes validation and every sanity rule with default
/// thresholds.
#[must_use]
pub fn valid_facts_json() -> Value {
    json!({
        "market": {
            "current_revenue_usd_m": 830,
            "peak_revenue_usd_m": 4500,
            "years_to_peak": 6,
            "total_revenue_usd_m": 29250,
            "unit_price_usd": 150000,
            "persistence_rate": 0.8,
            "patient_population": 150000,
            "geographic_split": {"united_states": 0.55, "europe": 0.30, "rest_of_world": 0.15}
        },
        "deals": [
            {
                "asset_name": "AB-101",
                "stage": "Phase 3",
                "price_usd_m": 1200,
                "date": "2023-05-01",
                "rationale": "Same target class, global rights licensed after positive Phase 2 data",
                "sources": ["https://news.example.com/ab-101-licensing"]
            },
            {
                "asset_name": "CX-77",
                "stage": "Phase 2",
                "price_usd_m": "$650",
                "date": "2022-11-15",
                "rationale": "Adjacent mechanism acquired to complement a late-stage franchise",
                "sources": ["https://press.example.org/cx-77"]
            }
        ],
        "assumptions": {
            "pricing_basis": "US list price benchmarked against approved comparators",
            "penetration_rate": 0.12,
            "notes": ["Penetration ramps over four years"]
        },
        "regulatory": {
            "orphan_designation": false,
            "breakthrough_designation": true,
            "pathway": "Standard"
        },
        "ip": {"patent_expiry_year": 2038, "exclusivity_strength": 8},
        "competition": {
            "same_category_count": 25,
            "total_pipeline_count": 100,
            "competitive_intensity": 6,
            "target_profile": [0.8, 0.6, 0.7],
            "benchmark_profile": [0.7, 0.7, 0.6]
        },
        "forecast": {
            "yearly": [
                {"year": 2025, "revenue_usd_m": 1200},
                {"year": 2026, "revenue_usd_m": 2400},
                {"year": 2027, "revenue_usd_m": 3600},
                {"year": 2028, "revenue_usd_m": 4500},
                {"year": 2029, "revenue_usd_m": 4500},
                {"year": 2030, "revenue_usd_m": 4500},
                {"year": 2031, "revenue_usd_m": 4500},
                {"year": 2032, "revenue_usd_m": 4050}
            ]
        },
        "sources": {
            "market": ["https://reports.example.com/market-sizing"],
            "competition": ["https://pipeline.example.com/landscape"]
        }
    })
}

/// [`valid_facts_json`] decoded.
///
/// # Panics
///
/// Never in practice; the fixture matches the payload model.
#[must_use]
pub fn valid_facts() -> RawFacts {
    serde_json::from_value(valid_facts_json()).expect("fixture facts decode")
}
