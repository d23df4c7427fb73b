//! The retrieval-validation state machine.
//!
//! One [`Orchestrator::run`] drives a single request from `Idle` to exactly
//! one terminal state. Retrieval calls are bounded by
//! `1 + escalation_budget`; the repair stage is tried at most once per
//! defective response and never counts as a call. Transport failures,
//! timeouts and unparseable answers end the run immediately.

use chrono::Utc;
use lode_cache::Fingerprint;
use lode_config::{PipelineConfig, RetrievalConfig, SanityConfig};
use lode_core::facts::RawFacts;
use lode_core::issues::partition;
use lode_core::{RequestSpec, ResearchResult, UsageLedger, ValidationIssue};
use lode_quality::{ValidatedFacts, repair, sanity_check};
use lode_retrieval::{
    EscalationPolicy, RetrievalResponse, Retriever, TransportError, build_request, parse_facts,
};

use crate::error::ResearchError;
use crate::state::PipelineState;

/// Everything one run produced, whichever way it ended.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: Result<ResearchResult, ResearchError>,
    /// Every state visited, starting with `Idle`.
    pub transitions: Vec<PipelineState>,
    pub usage: UsageLedger,
}

impl RunReport {
    #[must_use]
    pub fn final_state(&self) -> PipelineState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(PipelineState::Idle)
    }
}

/// Mutable context of a single run. Created fresh by every call to
/// [`Orchestrator::run`].
struct Run {
    trace_id: String,
    state: PipelineState,
    transitions: Vec<PipelineState>,
    usage: UsageLedger,
}

impl Run {
    fn new(trace_id: &str) -> Self {
        Self {
            trace_id: trace_id.to_string(),
            state: PipelineState::Idle,
            transitions: vec![PipelineState::Idle],
            usage: UsageLedger::default(),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        if !self.state.can_transition_to(next) {
            tracing::error!(from = %self.state, to = %next, "illegal pipeline transition");
            debug_assert!(false, "illegal transition {} -> {next}", self.state);
        }
        tracing::debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
        self.transitions.push(next);
    }

    fn finish(self, outcome: Result<ResearchResult, ResearchError>) -> RunReport {
        RunReport {
            outcome,
            transitions: self.transitions,
            usage: self.usage,
        }
    }

    fn fail_transport(mut self, source: TransportError) -> RunReport {
        tracing::warn!(error = %source, "retrieval failed");
        self.advance(PipelineState::Failed);
        let trace_id = self.trace_id.clone();
        self.finish(Err(ResearchError::Transport { trace_id, source }))
    }

    fn reject(mut self, issues: Vec<ValidationIssue>) -> RunReport {
        let attempts = self.usage.retrieval_calls;
        tracing::warn!(attempts, issues = issues.len(), "facts rejected");
        self.advance(PipelineState::Rejected);
        let trace_id = self.trace_id.clone();
        self.finish(Err(ResearchError::DataQualityRejected {
            trace_id,
            attempts,
            issues,
        }))
    }
}

/// What the validation stage made of one fetched response.
enum Verdict {
    Accepted {
        validated: ValidatedFacts,
        repairs: Vec<String>,
    },
    Defective(Vec<ValidationIssue>),
}

pub struct Orchestrator<R> {
    retriever: R,
    retrieval: RetrievalConfig,
    pipeline: PipelineConfig,
    sanity: SanityConfig,
}

impl<R: Retriever> Orchestrator<R> {
    pub const fn new(
        retriever: R,
        retrieval: RetrievalConfig,
        pipeline: PipelineConfig,
        sanity: SanityConfig,
    ) -> Self {
        Self {
            retriever,
            retrieval,
            pipeline,
            sanity,
        }
    }

    #[must_use]
    pub const fn retrieval_config(&self) -> &RetrievalConfig {
        &self.retrieval
    }

    /// Drive one request to a terminal state.
    pub async fn run(
        &self,
        spec: &RequestSpec,
        fingerprint: &Fingerprint,
        trace_id: &str,
    ) -> RunReport {
        let mut run = Run::new(trace_id);
        let mut attempt: u32 = 0;
        let mut defects: Vec<ValidationIssue> = Vec::new();

        run.advance(PipelineState::Fetching);
        let (validated, repairs) = loop {
            let response = match self.fetch(spec, attempt, &defects).await {
                Ok(response) => {
                    run.usage.record_call(response.usage);
                    response
                }
                Err(source) => {
                    run.usage.record_call(None);
                    return run.fail_transport(source);
                }
            };

            run.advance(PipelineState::Validating);
            let facts = match parse_facts(&response.body) {
                Ok(facts) => facts,
                Err(source) => return run.fail_transport(source),
            };

            match self.validate(&mut run, facts) {
                Verdict::Accepted { validated, repairs } => break (validated, repairs),
                Verdict::Defective(issues) if attempt < self.pipeline.escalation_budget => {
                    attempt += 1;
                    tracing::info!(
                        attempt,
                        defects = issues.len(),
                        policy = %EscalationPolicy::for_attempt(attempt),
                        "escalating retrieval"
                    );
                    defects = issues;
                    run.advance(PipelineState::Escalating);
                    run.advance(PipelineState::Fetching);
                }
                Verdict::Defective(issues) => return run.reject(issues),
            }
        };

        run.advance(PipelineState::SanityChecking);
        let (blocking, _) = partition(sanity_check(validated.facts(), &self.sanity));
        if !blocking.is_empty() {
            return run.reject(blocking);
        }

        run.advance(PipelineState::Computing);
        let derived = match lode_calc::derive(validated.facts()) {
            Ok(derived) => derived,
            Err(source) => {
                tracing::error!(error = %source, "calculator rejected validated facts");
                run.advance(PipelineState::Failed);
                let trace_id = run.trace_id.clone();
                return run.finish(Err(ResearchError::Computation { trace_id, source }));
            }
        };

        let (facts, deals, quality_warnings) = validated.into_parts();
        let result = ResearchResult {
            fingerprint: fingerprint.to_string(),
            trace_id: run.trace_id.clone(),
            model: self.retrieval.model.clone(),
            request: spec.clone(),
            facts,
            deals,
            derived,
            quality_warnings,
            repairs,
            usage: run.usage,
            generated_at: Utc::now(),
        };
        run.advance(PipelineState::Done);
        run.finish(Ok(result))
    }

    /// One retrieval call under the configured timeout.
    async fn fetch(
        &self,
        spec: &RequestSpec,
        attempt: u32,
        defects: &[ValidationIssue],
    ) -> Result<RetrievalResponse, TransportError> {
        let policy = EscalationPolicy::for_attempt(attempt);
        let request = build_request(spec, policy.configure(&self.retrieval, defects));
        let timeout = self.retrieval.timeout();
        tokio::time::timeout(timeout, self.retriever.retrieve(&request))
            .await
            .map_err(|_| TransportError::Timeout {
                secs: timeout.as_secs(),
            })?
    }

    /// Validate a fetched payload, trying the repair stage once.
    fn validate(&self, run: &mut Run, facts: RawFacts) -> Verdict {
        let rejected = match ValidatedFacts::accept(facts) {
            Ok(validated) => {
                return Verdict::Accepted {
                    validated,
                    repairs: Vec::new(),
                };
            }
            Err(rejected) => rejected,
        };
        if !self.pipeline.repair_enabled {
            return Verdict::Defective(blocking_only(rejected.issues));
        }

        run.advance(PipelineState::Repairing);
        let outcome = repair(rejected.facts, &rejected.issues);
        run.advance(PipelineState::Validating);
        if !outcome.changed() {
            return Verdict::Defective(blocking_only(rejected.issues));
        }
        match ValidatedFacts::accept(outcome.facts) {
            Ok(validated) => Verdict::Accepted {
                validated,
                repairs: outcome.repaired,
            },
            Err(still) => Verdict::Defective(blocking_only(still.issues)),
        }
    }
}

fn blocking_only(issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
    partition(issues).0
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use async_trait::async_trait;
    use lode_cache::fingerprint_value;
    use lode_core::fixtures::{sample_request, valid_facts_json};
    use lode_retrieval::RetrievalRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use PipelineState::{
        Computing, Done, Escalating, Fetching, Idle, Rejected, Repairing, SanityChecking,
        Validating,
    };

    struct Scripted {
        bodies: Mutex<VecDeque<String>>,
    }

    impl Scripted {
        fn new(bodies: Vec<serde_json::Value>) -> Self {
            Self {
                bodies: Mutex::new(bodies.into_iter().map(|b| b.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl Retriever for Scripted {
        async fn retrieve(
            &self,
            _request: &RetrievalRequest,
        ) -> Result<RetrievalResponse, TransportError> {
            let mut bodies = self.bodies.lock().unwrap();
            let body = if bodies.len() > 1 {
                bodies.pop_front().unwrap()
            } else {
                bodies.front().cloned().unwrap()
            };
            Ok(RetrievalResponse { body, usage: None })
        }
    }

    fn orchestrator(bodies: Vec<serde_json::Value>) -> Orchestrator<Scripted> {
        Orchestrator::new(
            Scripted::new(bodies),
            RetrievalConfig::default(),
            PipelineConfig::default(),
            SanityConfig::default(),
        )
    }

    async fn run(orch: &Orchestrator<Scripted>) -> RunReport {
        orch.run(&sample_request(), &fingerprint_value(&json!("t")), "trace")
            .await
    }

    #[tokio::test]
    async fn happy_path_visits_each_stage_once() {
        let report = run(&orchestrator(vec![valid_facts_json()])).await;
        assert!(report.outcome.is_ok());
        assert_eq!(
            report.transitions,
            vec![Idle, Fetching, Validating, SanityChecking, Computing, Done]
        );
        assert_eq!(report.usage.retrieval_calls, 1);
    }

    #[tokio::test]
    async fn escalation_then_success() {
        let mut broken = valid_facts_json();
        broken["deals"][0]["price_usd_m"] = serde_json::Value::Null;
        let report = run(&orchestrator(vec![broken, valid_facts_json()])).await;

        assert_eq!(report.final_state(), Done);
        assert_eq!(
            report.transitions,
            vec![
                Idle,
                Fetching,
                Validating,
                Repairing,
                Validating,
                Escalating,
                Fetching,
                Validating,
                SanityChecking,
                Computing,
                Done
            ]
        );
        assert_eq!(report.usage.retrieval_calls, 2);
    }

    #[tokio::test]
    async fn repair_revalidates_without_refetching() {
        let mut payload = valid_facts_json();
        payload["deals"][1]["date"] = "2022/11/15".into();
        let report = run(&orchestrator(vec![payload])).await;

        assert_eq!(
            report.transitions,
            vec![
                Idle,
                Fetching,
                Validating,
                Repairing,
                Validating,
                SanityChecking,
                Computing,
                Done
            ]
        );
        let result = report.outcome.unwrap();
        assert_eq!(result.repairs, vec!["deals[1].date"]);
        assert_eq!(result.usage.retrieval_calls, 1);
    }

    #[tokio::test]
    async fn repair_can_be_disabled() {
        let mut payload = valid_facts_json();
        payload["deals"][1]["date"] = "2022/11/15".into();
        let orch = Orchestrator::new(
            Scripted::new(vec![payload]),
            RetrievalConfig::default(),
            PipelineConfig {
                escalation_budget: 0,
                repair_enabled: false,
            },
            SanityConfig::default(),
        );
        let report = run(&orch).await;
        assert_eq!(
            report.transitions,
            vec![Idle, Fetching, Validating, Rejected]
        );
    }
}
