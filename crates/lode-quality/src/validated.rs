//! The accepted form of a facts payload.

use lode_core::facts::RawFacts;
use lode_core::issues::{has_blocking, partition};
use lode_core::{Deal, IssueOrigin, ValidationIssue};

use crate::validator::validate;

/// Facts that passed both validation tiers, with their typed deals.
///
/// There is no mutable access; the only way to get one is [`Self::accept`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFacts {
    facts: RawFacts,
    deals: Vec<Deal>,
    warnings: Vec<ValidationIssue>,
}

/// A payload that failed validation, handed back for repair or escalation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub facts: RawFacts,
    /// Every finding, blocking and non-blocking, in validator order.
    pub issues: Vec<ValidationIssue>,
}

impl Rejected {
    /// Only the issues that caused the rejection.
    #[must_use]
    pub fn blocking(&self) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.is_blocking()).collect()
    }
}

impl ValidatedFacts {
    /// Validate `facts` and, when no blocking issue remains, convert every
    /// deal record into a [`Deal`].
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`] carrying the payload and its issues when any
    /// error-severity issue is found.
    pub fn accept(facts: RawFacts) -> Result<Self, Rejected> {
        let issues = validate(&facts);
        if has_blocking(&issues) {
            return Err(Rejected { facts, issues });
        }

        let mut deals = Vec::with_capacity(facts.deals.len());
        let mut defects = Vec::new();
        for (idx, record) in facts.deals.iter().enumerate() {
            match Deal::try_from(record) {
                Ok(deal) => deals.push(deal),
                Err(found) => defects.extend(found.into_iter().map(|d| {
                    ValidationIssue::error(
                        IssueOrigin::Structural,
                        format!("deals[{idx}].{}", d.field),
                        d.reason,
                    )
                })),
            }
        }
        if !defects.is_empty() {
            return Err(Rejected {
                facts,
                issues: defects,
            });
        }

        let (_, warnings) = partition(issues);
        Ok(Self {
            facts,
            deals,
            warnings,
        })
    }

    #[must_use]
    pub const fn facts(&self) -> &RawFacts {
        &self.facts
    }

    #[must_use]
    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    #[must_use]
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    #[must_use]
    pub fn into_parts(self) -> (RawFacts, Vec<Deal>, Vec<ValidationIssue>) {
        (self.facts, self.deals, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::repair;
    use lode_core::DevelopmentStage;
    use lode_core::fixtures::valid_facts;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_facts_are_accepted_with_typed_deals() {
        let validated = ValidatedFacts::accept(valid_facts()).unwrap();
        assert_eq!(validated.deals().len(), 2);
        assert_eq!(validated.deals()[0].stage, DevelopmentStage::Phase3);
        assert_eq!(validated.deals()[1].price_usd_m, 650.0);
        assert!(validated.warnings().is_empty());
    }

    #[test]
    fn malformed_source_map_url_is_rejected_until_repaired() {
        let mut facts = valid_facts();
        facts.sources.insert("ip".into(), vec!["patent office".into()]);
        let rejected = ValidatedFacts::accept(facts).unwrap_err();
        let paths: Vec<_> = rejected.blocking().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["sources.ip[0]"]);

        let outcome = repair(rejected.facts, &rejected.issues);
        let accepted = ValidatedFacts::accept(outcome.facts).unwrap();
        assert_eq!(validate(accepted.facts()), Vec::new());
    }

    #[test]
    fn rejection_returns_the_payload() {
        let mut facts = valid_facts();
        facts.deals[1].rationale = None;
        let rejected = ValidatedFacts::accept(facts.clone()).unwrap_err();
        assert_eq!(rejected.facts, facts);
        let paths: Vec<_> = rejected.blocking().iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["deals[1].rationale"]);
    }
}
