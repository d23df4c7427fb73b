//! Request-level service: fingerprinting, caching, audit.
//!
//! [`ResearchService::handle`] is the single entry point the CLI calls. It
//! wraps one orchestrator run with a cache lookup before and a cache write
//! plus an audit append after. Cache and audit failures never fail the
//! request; they surface as [`PipelineWarning`]s.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use lode_cache::{Fingerprint, ResultCache, SizeGuardedCache, fingerprint};
use lode_config::{LodeConfig, RetrievalConfig};
use lode_core::audit::{AuditOutcome, AuditRecord};
use lode_core::{RequestSpec, ResearchResult};
use lode_retrieval::{EscalationPolicy, Retriever};
use lode_store::AuditSink;
use serde::Serialize;
use tracing::Instrument;

use crate::error::ResearchError;
use crate::orchestrator::Orchestrator;
use crate::warning::PipelineWarning;

/// Cache key for `spec`: the request, the model and the baseline search
/// parameters. Escalation never changes it.
#[must_use]
pub fn request_fingerprint(retrieval: &RetrievalConfig, spec: &RequestSpec) -> Fingerprint {
    let params = EscalationPolicy::Baseline
        .configure(retrieval, &[])
        .search_params(spec.full_research());
    fingerprint(spec, &retrieval.model, &params)
}

/// Per-call switches.
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    /// Consult the cache before computing. A fresh result is still written.
    pub use_cache: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

/// A successful answer plus the non-fatal conditions met producing it.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchResponse {
    pub result: ResearchResult,
    pub cache_hit: bool,
    pub warnings: Vec<PipelineWarning>,
}

pub struct ResearchService<R> {
    orchestrator: Orchestrator<R>,
    cache: Option<Arc<dyn ResultCache>>,
    audit: Option<Arc<dyn AuditSink>>,
    max_payload_bytes: usize,
    ttl: Duration,
}

impl<R: Retriever> ResearchService<R> {
    #[must_use]
    pub fn new(retriever: R, config: &LodeConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(
                retriever,
                config.retrieval.clone(),
                config.pipeline.clone(),
                config.sanity.clone(),
            ),
            cache: None,
            audit: None,
            max_payload_bytes: config.cache.max_payload_bytes,
            ttl: config.cache.ttl(),
        }
    }

    /// Attach a cache backend. Writes are size-guarded by
    /// `cache.max_payload_bytes`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = Some(Arc::new(SizeGuardedCache::new(
            cache,
            self.max_payload_bytes,
        )));
        self
    }

    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Cache key for `spec` under the configured model and baseline search
    /// parameters.
    #[must_use]
    pub fn fingerprint(&self, spec: &RequestSpec) -> Fingerprint {
        request_fingerprint(self.orchestrator.retrieval_config(), spec)
    }

    /// Answer `spec`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError`] when the pipeline ends in `Rejected` or
    /// `Failed`.
    pub async fn handle(&self, spec: &RequestSpec) -> Result<ResearchResponse, ResearchError> {
        self.handle_with(spec, RequestOptions::default()).await
    }

    /// Answer `spec` with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError`] when the pipeline ends in `Rejected` or
    /// `Failed`.
    pub async fn handle_with(
        &self,
        spec: &RequestSpec,
        options: RequestOptions,
    ) -> Result<ResearchResponse, ResearchError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let fingerprint = self.fingerprint(spec);
        let span = tracing::info_span!(
            "research",
            trace_id = %trace_id,
            fingerprint = %fingerprint.short(),
        );
        self.handle_inner(spec, options, &fingerprint, &trace_id)
            .instrument(span)
            .await
    }

    async fn handle_inner(
        &self,
        spec: &RequestSpec,
        options: RequestOptions,
        fingerprint: &Fingerprint,
        trace_id: &str,
    ) -> Result<ResearchResponse, ResearchError> {
        let started = Instant::now();
        let mut warnings = Vec::new();

        if options.use_cache {
            if let Some(result) = self.cached(fingerprint, &mut warnings).await {
                tracing::info!("served from cache");
                let record = self.audit_record(
                    spec,
                    fingerprint,
                    trace_id,
                    started,
                    AuditOutcome::CacheHit,
                    Some(&result),
                );
                self.append_audit(&record, &mut warnings).await;
                return Ok(ResearchResponse {
                    result,
                    cache_hit: true,
                    warnings,
                });
            }
        }

        let report = self.orchestrator.run(spec, fingerprint, trace_id).await;
        tracing::debug!(
            state = %report.final_state(),
            calls = report.usage.retrieval_calls,
            "pipeline finished"
        );
        match report.outcome {
            Ok(result) => {
                self.store(fingerprint, &result, &mut warnings).await;
                let record = self.audit_record(
                    spec,
                    fingerprint,
                    trace_id,
                    started,
                    AuditOutcome::Computed,
                    Some(&result),
                );
                self.append_audit(&record, &mut warnings).await;
                tracing::info!(
                    calls = result.usage.retrieval_calls,
                    deals = result.deals.len(),
                    "research computed"
                );
                Ok(ResearchResponse {
                    result,
                    cache_hit: false,
                    warnings,
                })
            }
            Err(err) => {
                let outcome = match &err {
                    ResearchError::DataQualityRejected { .. } => AuditOutcome::Rejected,
                    _ => AuditOutcome::Failed,
                };
                let mut record =
                    self.audit_record(spec, fingerprint, trace_id, started, outcome, None);
                record.retrieval_calls = report.usage.retrieval_calls;
                self.append_audit(&record, &mut warnings).await;
                tracing::warn!(category = %err.category(), error = %err, "research failed");
                Err(err)
            }
        }
    }

    async fn cached(
        &self,
        fingerprint: &Fingerprint,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Option<ResearchResult> {
        let cache = self.cache.as_ref()?;
        let bytes = match cache.get(fingerprint).await {
            Ok(hit) => hit?,
            Err(e) => {
                tracing::warn!(error = %e, "cache lookup failed");
                warnings.push(PipelineWarning::CacheRead(e.to_string()));
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(error = %e, "cached payload is unreadable");
                warnings.push(PipelineWarning::CacheRead(e.to_string()));
                None
            }
        }
    }

    async fn store(
        &self,
        fingerprint: &Fingerprint,
        result: &ResearchResult,
        warnings: &mut Vec<PipelineWarning>,
    ) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let outcome = match serde_json::to_vec(result) {
            Ok(payload) => cache
                .set(fingerprint, &payload, self.ttl)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(reason) = outcome {
            tracing::warn!(reason = %reason, "result not cached");
            warnings.push(PipelineWarning::CacheWrite(reason));
        }
    }

    fn audit_record(
        &self,
        spec: &RequestSpec,
        fingerprint: &Fingerprint,
        trace_id: &str,
        started: Instant,
        outcome: AuditOutcome,
        result: Option<&ResearchResult>,
    ) -> AuditRecord {
        let source_count = result.map_or(0, |r| {
            u32::try_from(r.facts.source_count()).unwrap_or(u32::MAX)
        });
        let retrieval_calls = match (outcome, result) {
            (AuditOutcome::CacheHit, _) | (_, None) => 0,
            (_, Some(r)) => r.usage.retrieval_calls,
        };
        AuditRecord {
            trace_id: trace_id.to_string(),
            fingerprint: fingerprint.to_string(),
            request: spec.clone(),
            model: self.orchestrator.retrieval_config().model.clone(),
            duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            source_count,
            retrieval_calls,
            outcome,
            created_at: Utc::now(),
        }
    }

    async fn append_audit(&self, record: &AuditRecord, warnings: &mut Vec<PipelineWarning>) {
        let Some(audit) = self.audit.as_ref() else {
            return;
        };
        if let Err(e) = audit.append(record).await {
            tracing::warn!(error = %e, "audit append failed");
            warnings.push(PipelineWarning::Audit(e.to_string()));
        }
    }
}
