//! Retrieval payload model.
//!
//! Every leaf is optional or defaulted so that a structurally incomplete
//! payload still parses; the validator turns absences into issues. The
//! [`schemars::JsonSchema`] derive doubles as the output-shape contract sent
//! to the retrieval service.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lenient;

/// Market sizing block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketFacts {
    /// Current annual revenue of the addressable market, USD millions.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub current_revenue_usd_m: Option<f64>,

    /// Peak annual revenue, USD millions.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub peak_revenue_usd_m: Option<f64>,

    /// Years from today until peak revenue.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub years_to_peak: Option<f64>,

    /// Cumulative revenue over the forecast horizon, USD millions.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub total_revenue_usd_m: Option<f64>,

    /// Annual price per treated patient, USD.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub unit_price_usd: Option<f64>,

    /// Fraction of patients remaining on therapy over a year (0..=1).
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub persistence_rate: Option<f64>,

    /// Prevalent patient population in the requested geography.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub patient_population: Option<f64>,

    /// Revenue share by region; shares sum to 1.
    #[serde(default, deserialize_with = "lenient::share_map")]
    #[schemars(with = "BTreeMap<String, f64>")]
    pub geographic_split: BTreeMap<String, f64>,
}

/// A transaction comparable as returned by the retrieval service.
///
/// See [`crate::deal::Deal`] for the fully-populated form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DealRecord {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub asset_name: Option<String>,

    /// One of: Preclinical, Phase 1, Phase 2, Phase 3, Filed, Approved.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub stage: Option<String>,

    /// Headline deal value, USD millions. Kept as text so the exact emitted
    /// value survives for placeholder checks.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub price_usd_m: Option<String>,

    /// Announcement date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub date: Option<String>,

    /// Why the deal is a relevant comparable (at least 20 characters).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub rationale: Option<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    #[schemars(with = "Vec<String>")]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Assumptions {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub pricing_basis: Option<String>,

    /// Share of eligible patients treated at peak (0..=1).
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub penetration_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    #[schemars(with = "Vec<String>")]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegulatoryFacts {
    /// Whether the asset holds (or is asserted eligible for) orphan designation.
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    #[schemars(with = "Option<bool>")]
    pub orphan_designation: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_bool")]
    #[schemars(with = "Option<bool>")]
    pub breakthrough_designation: Option<bool>,

    #[serde(default, deserialize_with = "lenient::opt_string")]
    #[schemars(with = "Option<String>")]
    pub pathway: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IpFacts {
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    #[schemars(with = "Option<i32>")]
    pub patent_expiry_year: Option<i32>,

    /// Strength score on a 1-10 scale.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub exclusivity_strength: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitionFacts {
    /// Pipeline assets sharing the requested target/mechanism.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub same_category_count: Option<f64>,

    /// All pipeline assets in the indication.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub total_pipeline_count: Option<f64>,

    /// Intensity score on a 1-10 scale.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub competitive_intensity: Option<f64>,

    /// Feature profile of the requested asset (efficacy, safety, convenience, ...).
    #[serde(default, deserialize_with = "lenient::f64_list")]
    #[schemars(with = "Vec<f64>")]
    pub target_profile: Vec<f64>,

    /// Same features for the standard-of-care benchmark.
    #[serde(default, deserialize_with = "lenient::f64_list")]
    #[schemars(with = "Vec<f64>")]
    pub benchmark_profile: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct YearlyRevenue {
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    #[schemars(with = "Option<i32>")]
    pub year: Option<i32>,

    #[serde(default, deserialize_with = "lenient::opt_f64")]
    #[schemars(with = "Option<f64>")]
    pub revenue_usd_m: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    #[serde(default)]
    pub yearly: Vec<YearlyRevenue>,
}

/// Structured facts returned by the retrieval service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawFacts {
    #[serde(default)]
    pub market: MarketFacts,
    #[serde(default)]
    pub deals: Vec<DealRecord>,
    #[serde(default)]
    pub assumptions: Assumptions,
    #[serde(default)]
    pub regulatory: RegulatoryFacts,
    #[serde(default)]
    pub ip: IpFacts,
    #[serde(default)]
    pub competition: CompetitionFacts,
    #[serde(default)]
    pub forecast: Forecast,
    /// Field name -> supporting URLs.
    #[serde(default, deserialize_with = "lenient::source_map")]
    #[schemars(with = "BTreeMap<String, Vec<String>>")]
    pub sources: BTreeMap<String, Vec<String>>,
}

impl RawFacts {
    /// Number of distinct source URLs across the source map and all deals.
    #[must_use]
    pub fn source_count(&self) -> usize {
        let mut urls: Vec<&str> = self
            .sources
            .values()
            .flatten()
            .chain(self.deals.iter().flat_map(|d| d.sources.iter()))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        urls.sort_unstable();
        urls.dedup();
        urls.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_parses_to_defaults() {
        let facts: RawFacts = serde_json::from_str("{}").unwrap();
        assert_eq!(facts, RawFacts::default());
    }

    #[test]
    fn lenient_fields_decode_strings() {
        let facts: RawFacts = serde_json::from_str(
            r#"{
                "market": {"peak_revenue_usd_m": "$4,500", "persistence_rate": "80%"},
                "regulatory": {"orphan_designation": "yes"},
                "ip": {"patent_expiry_year": "2038"},
                "deals": [{"asset_name": "AB-101", "price_usd_m": 250, "sources": "https://example.org/a"}],
                "sources": {"market": "https://example.org/m"}
            }"#,
        )
        .unwrap();
        assert_eq!(facts.market.peak_revenue_usd_m, Some(4500.0));
        assert_eq!(facts.market.persistence_rate, Some(0.8));
        assert_eq!(facts.regulatory.orphan_designation, Some(true));
        assert_eq!(facts.ip.patent_expiry_year, Some(2038));
        assert_eq!(facts.deals[0].price_usd_m.as_deref(), Some("250"));
        assert_eq!(facts.deals[0].sources.len(), 1);
        assert_eq!(facts.sources["market"].len(), 1);
    }

    #[test]
    fn source_count_deduplicates_across_blocks() {
        let mut facts = RawFacts::default();
        facts
            .sources
            .insert("market".into(), vec!["https://a.org".into(), "https://b.org".into()]);
        facts.deals.push(DealRecord {
            sources: vec!["https://a.org".into(), " ".into()],
            ..DealRecord::default()
        });
        assert_eq!(facts.source_count(), 2);
    }

    #[test]
    fn output_schema_mentions_every_block() {
        let schema = serde_json::to_value(schemars::schema_for!(RawFacts)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for key in ["market", "deals", "regulatory", "ip", "competition", "forecast", "sources"] {
            assert!(properties.contains_key(key), "schema missing {key}");
        }
    }
}
