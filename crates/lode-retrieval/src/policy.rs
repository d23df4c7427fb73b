//! Escalation policies.
//!
//! Each retry after a failed validation moves one step down an ordered list
//! of policies. A policy is a tag; [`EscalationPolicy::configure`] turns it
//! into the concrete [`RequestConfig`] sent with the next retrieval call.

use std::fmt;

use lode_config::RetrievalConfig;
use lode_core::ValidationIssue;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Upper bound on defects echoed back to the service in one request.
pub const MAX_REPORTED_DEFECTS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// First attempt: default parameters, no defect list.
    Baseline,
    /// Re-ask with the prior defects listed and the schema enforced.
    Corrective,
    /// Highest effort, zero temperature, widest search.
    MaximalStrictness,
}

impl EscalationPolicy {
    /// The ordered escalation ladder.
    pub const LADDER: [Self; 3] = [Self::Baseline, Self::Corrective, Self::MaximalStrictness];

    /// Policy for the zero-based attempt number, clamped at the last rung.
    #[must_use]
    pub fn for_attempt(attempt: u32) -> Self {
        let idx = usize::try_from(attempt).unwrap_or(usize::MAX);
        Self::LADDER[idx.min(Self::LADDER.len() - 1)]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Corrective => "corrective",
            Self::MaximalStrictness => "maximal_strictness",
        }
    }

    /// Build the concrete request configuration for this policy.
    ///
    /// Only blocking issues are carried as defects; the baseline policy
    /// ignores them entirely.
    #[must_use]
    pub fn configure(self, base: &RetrievalConfig, issues: &[ValidationIssue]) -> RequestConfig {
        let defects = match self {
            Self::Baseline => Vec::new(),
            Self::Corrective | Self::MaximalStrictness => issues
                .iter()
                .filter(|i| i.is_blocking())
                .take(MAX_REPORTED_DEFECTS)
                .map(|i| format!("{}: {}", i.path, i.message))
                .collect(),
        };
        let (reasoning_effort, temperature, strict_schema, search_context_size) = match self {
            Self::Baseline => (
                ReasoningEffort::Medium,
                0.2,
                false,
                base.search_context_size.clone(),
            ),
            Self::Corrective => (
                ReasoningEffort::High,
                0.1,
                true,
                base.search_context_size.clone(),
            ),
            Self::MaximalStrictness => (ReasoningEffort::High, 0.0, true, "high".to_string()),
        };
        RequestConfig {
            policy: self,
            model: base.model.clone(),
            reasoning_effort,
            temperature,
            strict_schema,
            search_context_size,
            max_output_tokens: base.max_output_tokens,
            defects,
        }
    }
}

impl fmt::Display for EscalationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Concrete parameters for one retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub policy: EscalationPolicy,
    pub model: String,
    pub reasoning_effort: ReasoningEffort,
    pub temperature: f32,
    /// Ask the service to enforce the output schema strictly.
    pub strict_schema: bool,
    pub search_context_size: String,
    pub max_output_tokens: u32,
    /// Prior defects, rendered `path: message`.
    pub defects: Vec<String>,
}

impl RequestConfig {
    /// Search parameters that identify a request for caching purposes.
    ///
    /// Derived from the baseline configuration so a cached answer is keyed
    /// on what was asked, not on how many escalations it took.
    #[must_use]
    pub fn search_params(&self, full_research: bool) -> Value {
        json!({
            "search_context_size": self.search_context_size,
            "reasoning_effort": self.reasoning_effort.as_str(),
            "full_research": full_research,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_core::IssueOrigin;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn issues() -> Vec<ValidationIssue> {
        vec![
            ValidationIssue::error(IssueOrigin::Structural, "deals[0].stage", "missing stage"),
            ValidationIssue::warning(IssueOrigin::Business, "sources.ip[0]", "bad url"),
        ]
    }

    #[rstest]
    #[case(0, EscalationPolicy::Baseline)]
    #[case(1, EscalationPolicy::Corrective)]
    #[case(2, EscalationPolicy::MaximalStrictness)]
    #[case(7, EscalationPolicy::MaximalStrictness)]
    fn ladder_is_clamped(#[case] attempt: u32, #[case] expected: EscalationPolicy) {
        assert_eq!(EscalationPolicy::for_attempt(attempt), expected);
    }

    #[test]
    fn baseline_carries_no_defects() {
        let config = EscalationPolicy::Baseline.configure(&RetrievalConfig::default(), &issues());
        assert!(config.defects.is_empty());
        assert!(!config.strict_schema);
        assert_eq!(config.search_context_size, "medium");
        assert_eq!(config.model, "research-large");
    }

    #[test]
    fn corrective_lists_blocking_defects_only() {
        let config =
            EscalationPolicy::Corrective.configure(&RetrievalConfig::default(), &issues());
        assert_eq!(config.defects, vec!["deals[0].stage: missing stage"]);
        assert!(config.strict_schema);
        assert_eq!(config.reasoning_effort, ReasoningEffort::High);
    }

    #[test]
    fn maximal_strictness_widens_search() {
        let config = EscalationPolicy::MaximalStrictness
            .configure(&RetrievalConfig::default(), &issues());
        assert_eq!(config.search_context_size, "high");
        assert!(config.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn search_params_ignore_defects() {
        let base = RetrievalConfig::default();
        let a = EscalationPolicy::Baseline.configure(&base, &[]);
        let b = EscalationPolicy::Baseline.configure(&base, &issues());
        assert_eq!(a.search_params(false), b.search_params(false));
        assert_ne!(a.search_params(false), a.search_params(true));
    }
}
