//! Data quality validator.
//!
//! Two tiers, reported in a stable order so test assertions are
//! reproducible:
//!
//! 1. **Structural**: each deal record, in list order, checked field by field
//!    (see [`lode_core::facts::DealRecord::defects`]).
//! 2. **Business**: critical aggregates present and inside the calculator's
//!    domain, placeholder denylist, source map shape.
//!
//! An empty issue list means the payload is accepted.

use lode_core::deal::is_well_formed_url;
use lode_core::facts::RawFacts;
use lode_core::lenient;
use lode_core::{IssueOrigin, ValidationIssue};

use crate::placeholders::{is_placeholder_name, is_placeholder_number, placeholder_phrase};

/// Run both validation tiers.
#[must_use]
pub fn validate(facts: &RawFacts) -> Vec<ValidationIssue> {
    let mut issues = structural(facts);
    issues.extend(business(facts));
    issues
}

/// Structural tier: every deal must be fully populated and well-formed.
#[must_use]
pub fn structural(facts: &RawFacts) -> Vec<ValidationIssue> {
    facts
        .deals
        .iter()
        .enumerate()
        .flat_map(|(idx, deal)| {
            deal.defects().into_iter().map(move |defect| {
                ValidationIssue::error(
                    IssueOrigin::Structural,
                    format!("deals[{idx}].{}", defect.field),
                    defect.reason,
                )
            })
        })
        .collect()
}

/// A required positive market figure.
struct Required {
    path: &'static str,
    value: Option<f64>,
    positive: bool,
}

/// Business tier: critical aggregates, denylisted stand-ins, sources.
#[must_use]
pub fn business(facts: &RawFacts) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let market = &facts.market;
    let competition = &facts.competition;

    let required = [
        Required {
            path: "market.current_revenue_usd_m",
            value: market.current_revenue_usd_m,
            positive: true,
        },
        Required {
            path: "market.peak_revenue_usd_m",
            value: market.peak_revenue_usd_m,
            positive: true,
        },
        Required {
            path: "market.years_to_peak",
            value: market.years_to_peak,
            positive: true,
        },
        Required {
            path: "market.total_revenue_usd_m",
            value: market.total_revenue_usd_m,
            positive: true,
        },
        Required {
            path: "market.unit_price_usd",
            value: market.unit_price_usd,
            positive: true,
        },
        Required {
            path: "market.persistence_rate",
            value: market.persistence_rate,
            positive: false,
        },
        Required {
            path: "market.patient_population",
            value: market.patient_population,
            positive: true,
        },
        Required {
            path: "competition.total_pipeline_count",
            value: competition.total_pipeline_count,
            positive: true,
        },
        Required {
            path: "competition.same_category_count",
            value: competition.same_category_count,
            positive: false,
        },
    ];

    for field in &required {
        match field.value {
            None => issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                field.path,
                "required field is missing",
            )),
            Some(v) if field.positive && v <= 0.0 => issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                field.path,
                format!("must be positive, got {v}"),
            )),
            Some(v) if !field.positive && v < 0.0 => issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                field.path,
                format!("must not be negative, got {v}"),
            )),
            Some(v) if is_placeholder_number(v) => issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                field.path,
                format!("{v} is a known placeholder value"),
            )),
            Some(_) => {}
        }
    }

    if let Some(rate) = market.persistence_rate {
        if rate > 1.0 {
            issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                "market.persistence_rate",
                format!("must be within [0, 1], got {rate}"),
            ));
        }
    }

    check_profiles(facts, &mut issues);

    if facts.deals.is_empty() {
        issues.push(ValidationIssue::error(
            IssueOrigin::Business,
            "deals",
            "at least one comparable deal is required",
        ));
    }
    for (idx, deal) in facts.deals.iter().enumerate() {
        if let Some(name) = deal.asset_name.as_deref() {
            if is_placeholder_name(name) || placeholder_phrase(name).is_some() {
                issues.push(ValidationIssue::error(
                    IssueOrigin::Business,
                    format!("deals[{idx}].asset_name"),
                    format!("'{}' is a placeholder name", name.trim()),
                ));
            }
        }
        if let Some(price) = deal.price_usd_m.as_deref().and_then(lenient::parse_number) {
            if is_placeholder_number(price) {
                issues.push(ValidationIssue::error(
                    IssueOrigin::Business,
                    format!("deals[{idx}].price_usd_m"),
                    format!("{price} is a known placeholder value"),
                ));
            }
        }
        if let Some(phrase) = deal.rationale.as_deref().and_then(placeholder_phrase) {
            issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                format!("deals[{idx}].rationale"),
                format!("contains placeholder text '{phrase}'"),
            ));
        }
    }

    if facts.sources.values().all(Vec::is_empty) {
        issues.push(ValidationIssue::error(
            IssueOrigin::Business,
            "sources",
            "at least one sourced field is required",
        ));
    }
    for (field, urls) in &facts.sources {
        for (idx, url) in urls.iter().enumerate() {
            if !is_well_formed_url(url) {
                issues.push(ValidationIssue::error(
                    IssueOrigin::Business,
                    format!("sources.{field}[{idx}]"),
                    format!("'{url}' is not an http(s) URL"),
                ));
            }
        }
    }

    issues
}

fn check_profiles(facts: &RawFacts, issues: &mut Vec<ValidationIssue>) {
    let competition = &facts.competition;
    let profiles = [
        ("competition.target_profile", &competition.target_profile),
        ("competition.benchmark_profile", &competition.benchmark_profile),
    ];
    for (path, profile) in profiles {
        if profile.is_empty() {
            issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                path,
                "profile vector is missing",
            ));
        }
        if let Some(idx) = profile.iter().position(|v| !v.is_finite()) {
            issues.push(ValidationIssue::error(
                IssueOrigin::Business,
                format!("{path}[{idx}]"),
                "profile component is not numeric",
            ));
        }
    }
    let (a, b) = (&competition.target_profile, &competition.benchmark_profile);
    if !a.is_empty() && !b.is_empty() && a.len() != b.len() {
        issues.push(ValidationIssue::error(
            IssueOrigin::Business,
            "competition.benchmark_profile",
            format!(
                "length {} does not match target profile length {}",
                b.len(),
                a.len()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_core::fixtures::valid_facts;
    use lode_core::Severity;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_facts_have_no_issues() {
        assert_eq!(validate(&valid_facts()), Vec::new());
    }

    #[test]
    fn validation_is_idempotent_on_valid_facts() {
        let facts = valid_facts();
        assert!(validate(&facts).is_empty());
        assert!(validate(&facts).is_empty());
    }

    #[test]
    fn missing_deal_price_is_structural() {
        let mut facts = valid_facts();
        facts.deals[0].price_usd_m = None;
        let issues = validate(&facts);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "deals[0].price_usd_m");
        assert_eq!(issues[0].origin, IssueOrigin::Structural);
    }

    #[test]
    fn structural_issues_precede_business_issues() {
        let mut facts = valid_facts();
        facts.market.peak_revenue_usd_m = None;
        facts.deals[0].date = Some("01/05/2023".into());
        let paths: Vec<_> = validate(&facts).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["deals[0].date", "market.peak_revenue_usd_m"]);
    }

    #[test]
    fn empty_deals_and_sources_are_rejected() {
        let mut facts = valid_facts();
        facts.deals.clear();
        facts.sources.clear();
        let paths: Vec<_> = validate(&facts).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["deals", "sources"]);
    }

    #[test]
    fn placeholders_are_rejected() {
        let mut facts = valid_facts();
        facts.market.total_revenue_usd_m = Some(12345.0);
        facts.deals[0].asset_name = Some("TBD".into());
        facts.deals[0].rationale = Some("Lorem ipsum dolor sit amet consectetur".into());
        let paths: Vec<_> = validate(&facts).into_iter().map(|i| i.path).collect();
        assert_eq!(
            paths,
            vec![
                "market.total_revenue_usd_m",
                "deals[0].asset_name",
                "deals[0].rationale"
            ]
        );
    }

    #[test]
    fn out_of_domain_aggregates_are_rejected() {
        let mut facts = valid_facts();
        facts.market.persistence_rate = Some(1.4);
        facts.competition.total_pipeline_count = Some(0.0);
        facts.competition.benchmark_profile.pop();
        let paths: Vec<_> = validate(&facts).into_iter().map(|i| i.path).collect();
        assert_eq!(
            paths,
            vec![
                "competition.total_pipeline_count",
                "market.persistence_rate",
                "competition.benchmark_profile"
            ]
        );
    }

    #[test]
    fn malformed_source_map_url_blocks_acceptance() {
        let mut facts = valid_facts();
        facts
            .sources
            .entry("market".into())
            .or_default()
            .push("not a url".into());
        let issues = validate(&facts);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "sources.market[1]");
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
