use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::deal::Deal;
use crate::derived::DerivedFacts;
use crate::facts::RawFacts;
use crate::issues::ValidationIssue;
use crate::request::RequestSpec;

/// Token counts reported by one retrieval call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Per-request usage accumulator, threaded through a single pipeline run
/// and returned with its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLedger {
    pub retrieval_calls: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageLedger {
    /// Count one retrieval call. `usage` is `None` when the call failed
    /// before the service reported token counts.
    pub fn record_call(&mut self, usage: Option<TokenUsage>) {
        self.retrieval_calls += 1;
        if let Some(usage) = usage {
            self.input_tokens += usage.input_tokens;
            self.output_tokens += usage.output_tokens;
        }
    }

    #[must_use]
    pub const fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// The merged result of a successful pipeline run: validated facts, the
/// typed deals they contain, and the metrics derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub fingerprint: String,
    pub trace_id: String,
    pub model: String,
    pub request: RequestSpec,
    pub facts: RawFacts,
    pub deals: Vec<Deal>,
    pub derived: DerivedFacts,
    /// Non-blocking quality findings.
    pub quality_warnings: Vec<ValidationIssue>,
    /// Field paths filled by the repair stage rather than the retrieval
    /// service. Empty when the accepted payload was used as returned.
    pub repairs: Vec<String>,
    pub usage: UsageLedger,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_counts_calls_without_usage() {
        let mut ledger = UsageLedger::default();
        ledger.record_call(Some(TokenUsage {
            input_tokens: 100,
            output_tokens: 40,
        }));
        ledger.record_call(None);
        assert_eq!(ledger.retrieval_calls, 2);
        assert_eq!(ledger.total_tokens(), 140);
    }
}
