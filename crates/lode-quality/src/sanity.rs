//! Numeric plausibility checks.
//!
//! Cross-field rules that the validator's per-field checks cannot express.
//! Every violated rule appends one error-severity issue with origin
//! [`IssueOrigin::Sanity`]; nothing here fails or panics. Thresholds come
//! from [`SanityConfig`].

use lode_config::SanityConfig;
use lode_core::facts::RawFacts;
use lode_core::{IssueOrigin, ValidationIssue};

/// Valid range for 1-10 strength scores.
const SCORE_RANGE: (f64, f64) = (1.0, 10.0);

/// Run every sanity rule, in rule order.
#[must_use]
pub fn check(facts: &RawFacts, config: &SanityConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    geographic_split(facts, config, &mut issues);
    strength_scores(facts, config, &mut issues);
    revenue_multiple(facts, config, &mut issues);
    orphan_consistency(facts, config, &mut issues);
    pipeline_counts(facts, &mut issues);
    forecast_consistency(facts, config, &mut issues);
    if !issues.is_empty() {
        tracing::debug!(count = issues.len(), "sanity rules violated");
    }
    issues
}

fn issue(path: impl Into<String>, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue::error(IssueOrigin::Sanity, path, message)
}

fn geographic_split(facts: &RawFacts, config: &SanityConfig, issues: &mut Vec<ValidationIssue>) {
    let split = &facts.market.geographic_split;
    if split.is_empty() {
        return;
    }
    let mut all_valid = true;
    for (region, share) in split {
        if !share.is_finite() || !(0.0..=1.0).contains(share) {
            all_valid = false;
            issues.push(issue(
                format!("market.geographic_split.{region}"),
                format!("share {share} is outside [0, 1]"),
            ));
        }
    }
    if all_valid {
        let total: f64 = split.values().sum();
        if (total - 1.0).abs() > config.split_tolerance {
            issues.push(issue(
                "market.geographic_split",
                format!(
                    "shares sum to {total:.4}, expected 1 within {}",
                    config.split_tolerance
                ),
            ));
        }
    }
}

fn strength_scores(facts: &RawFacts, config: &SanityConfig, issues: &mut Vec<ValidationIssue>) {
    let scores = [
        ("ip.exclusivity_strength", facts.ip.exclusivity_strength),
        (
            "competition.competitive_intensity",
            facts.competition.competitive_intensity,
        ),
    ];
    for (path, score) in scores {
        let Some(score) = score else { continue };
        if config
            .strength_sentinels
            .iter()
            .any(|s| (s - score).abs() < f64::EPSILON)
        {
            issues.push(issue(
                path,
                format!("{score} is a known placeholder score"),
            ));
        } else if !(SCORE_RANGE.0..=SCORE_RANGE.1).contains(&score) {
            issues.push(issue(
                path,
                format!(
                    "score {score} is outside [{}, {}]",
                    SCORE_RANGE.0, SCORE_RANGE.1
                ),
            ));
        }
    }
}

fn revenue_multiple(facts: &RawFacts, config: &SanityConfig, issues: &mut Vec<ValidationIssue>) {
    let market = &facts.market;
    let (Some(total), Some(peak)) = (market.total_revenue_usd_m, market.peak_revenue_usd_m) else {
        return;
    };
    if peak <= 0.0 {
        return;
    }
    let multiple = total / peak;
    if multiple < config.revenue_multiple_min || multiple > config.revenue_multiple_max {
        issues.push(issue(
            "market.total_revenue_usd_m",
            format!(
                "total is {multiple:.2}x peak revenue, expected {}-{}x",
                config.revenue_multiple_min, config.revenue_multiple_max
            ),
        ));
    }
}

fn orphan_consistency(facts: &RawFacts, config: &SanityConfig, issues: &mut Vec<ValidationIssue>) {
    let Some(population) = facts.market.patient_population else {
        return;
    };
    if facts.regulatory.orphan_designation == Some(true) && population > config.orphan_threshold {
        issues.push(issue(
            "regulatory.orphan_designation",
            format!(
                "orphan designation asserted for {population} patients, above the {} ceiling",
                config.orphan_threshold
            ),
        ));
    }
}

fn pipeline_counts(facts: &RawFacts, issues: &mut Vec<ValidationIssue>) {
    let competition = &facts.competition;
    if let (Some(same), Some(total)) = (
        competition.same_category_count,
        competition.total_pipeline_count,
    ) {
        if same > total {
            issues.push(issue(
                "competition.same_category_count",
                format!("{same} same-category assets exceed the pipeline total {total}"),
            ));
        }
    }
}

fn forecast_consistency(
    facts: &RawFacts,
    config: &SanityConfig,
    issues: &mut Vec<ValidationIssue>,
) {
    let yearly = &facts.forecast.yearly;
    if yearly.is_empty() {
        return;
    }

    let mut previous: Option<i32> = None;
    let mut sum = 0.0;
    let mut complete = true;
    for (idx, entry) in yearly.iter().enumerate() {
        match entry.year {
            Some(year) if previous.is_some_and(|p| year <= p) => {
                issues.push(issue(
                    format!("forecast.yearly[{idx}].year"),
                    format!("year {year} does not follow the previous entry"),
                ));
                previous = Some(year);
            }
            Some(year) => previous = Some(year),
            None => issues.push(issue(
                format!("forecast.yearly[{idx}].year"),
                "missing year",
            )),
        }
        match entry.revenue_usd_m {
            Some(revenue) => sum += revenue,
            None => {
                complete = false;
                issues.push(issue(
                    format!("forecast.yearly[{idx}].revenue_usd_m"),
                    "missing revenue",
                ));
            }
        }
    }

    let Some(total) = facts.market.total_revenue_usd_m.filter(|t| *t > 0.0) else {
        return;
    };
    if complete {
        let gap = (sum - total).abs() / total;
        if gap > config.forecast_tolerance {
            issues.push(issue(
                "forecast.yearly",
                format!(
                    "yearly forecast sums to {sum}, {:.1}% away from total revenue {total}",
                    gap * 100.0
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_core::facts::YearlyRevenue;
    use lode_core::fixtures::valid_facts;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paths(facts: &RawFacts) -> Vec<String> {
        check(facts, &SanityConfig::default())
            .into_iter()
            .map(|i| i.path)
            .collect()
    }

    #[test]
    fn valid_facts_pass_every_rule() {
        assert_eq!(paths(&valid_facts()), Vec::<String>::new());
    }

    #[test]
    fn all_issues_are_blocking_sanity_issues() {
        let mut facts = valid_facts();
        facts.competition.same_category_count = Some(120.0);
        let issues = check(&facts, &SanityConfig::default());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_blocking());
        assert_eq!(issues[0].origin, IssueOrigin::Sanity);
    }

    #[rstest]
    #[case::excess(0.40, true)]
    #[case::within_tolerance(0.16, false)]
    #[case::shortfall(0.05, true)]
    fn split_must_sum_to_one(#[case] rest_of_world: f64, #[case] flagged: bool) {
        let mut facts = valid_facts();
        facts
            .market
            .geographic_split
            .insert("rest_of_world".into(), rest_of_world);
        let flagged_split = paths(&facts).contains(&"market.geographic_split".to_string());
        assert_eq!(flagged_split, flagged);
    }

    #[test]
    fn negative_share_is_reported_per_region() {
        let mut facts = valid_facts();
        facts
            .market
            .geographic_split
            .insert("europe".into(), -0.3);
        assert_eq!(paths(&facts), vec!["market.geographic_split.europe"]);
    }

    #[test]
    fn empty_split_is_not_checked() {
        let mut facts = valid_facts();
        facts.market.geographic_split.clear();
        assert!(paths(&facts).is_empty());
    }

    #[rstest]
    #[case::sentinel(7.5)]
    #[case::below_scale(0.0)]
    #[case::above_scale(11.0)]
    fn strength_scores_reject_sentinels_and_out_of_scale(#[case] score: f64) {
        let mut facts = valid_facts();
        facts.ip.exclusivity_strength = Some(score);
        facts.competition.competitive_intensity = Some(score);
        assert_eq!(
            paths(&facts),
            vec!["ip.exclusivity_strength", "competition.competitive_intensity"]
        );
    }

    #[test]
    fn configured_sentinels_are_honoured() {
        let mut facts = valid_facts();
        facts.ip.exclusivity_strength = Some(5.0);
        let config = SanityConfig {
            strength_sentinels: vec![5.0],
            ..SanityConfig::default()
        };
        let issues = check(&facts, &config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "ip.exclusivity_strength");
    }

    #[rstest]
    #[case::too_low(4500.0 * 4.0)]
    #[case::too_high(4500.0 * 9.0)]
    fn total_revenue_must_be_bounded_multiple_of_peak(#[case] total: f64) {
        let mut facts = valid_facts();
        facts.market.total_revenue_usd_m = Some(total);
        facts.forecast.yearly.clear();
        assert_eq!(paths(&facts), vec!["market.total_revenue_usd_m"]);
    }

    #[test]
    fn orphan_flag_conflicts_with_large_population() {
        let mut facts = valid_facts();
        facts.regulatory.orphan_designation = Some(true);
        assert!(paths(&facts).is_empty());

        facts.market.patient_population = Some(450_000.0);
        assert_eq!(paths(&facts), vec!["regulatory.orphan_designation"]);
    }

    #[test]
    fn forecast_years_must_increase() {
        let mut facts = valid_facts();
        facts.forecast.yearly.swap(0, 1);
        assert_eq!(paths(&facts), vec!["forecast.yearly[1].year"]);
    }

    #[test]
    fn forecast_sum_must_track_total_revenue() {
        let mut facts = valid_facts();
        facts.forecast.yearly.push(YearlyRevenue {
            year: Some(2033),
            revenue_usd_m: Some(4000.0),
        });
        assert_eq!(paths(&facts), vec!["forecast.yearly"]);
    }
}
