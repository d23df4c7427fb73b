//! Prompt rendering.
//!
//! Instructions are assembled from fixed sections plus the structured defect
//! list of the active [`RequestConfig`]; the policy itself decides what goes
//! in, this module only renders it.

use std::fmt::Write;

use lode_core::RequestSpec;
use lode_core::deal::MIN_RATIONALE_CHARS;
use lode_core::facts::RawFacts;
use serde_json::Value;

use crate::policy::{EscalationPolicy, RequestConfig};
use crate::retriever::RetrievalRequest;

/// Name under which the output schema is registered with the service.
pub const SCHEMA_NAME: &str = "raw_facts";

const ROLE: &str = "You are a biopharma market research analyst. Answer only with a \
single JSON object matching the provided schema. Use live web search and cite \
every figure with an http(s) URL in the `sources` map.";

const RULES: &str = "Rules:
- Monetary values are USD millions unless the field name says otherwise.
- `persistence_rate` and geographic shares are fractions between 0 and 1; shares sum to 1.
- Scores (`exclusivity_strength`, `competitive_intensity`) are on a 1-10 scale.
- Leave a field null rather than guessing; never emit placeholder values such as 12345, TBD or N/A.";

/// JSON Schema for [`RawFacts`], the answer shape the service must follow.
#[must_use]
pub fn output_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(RawFacts)).unwrap_or(Value::Null)
}

/// Render the instruction block for a request configuration.
#[must_use]
pub fn instructions(config: &RequestConfig) -> String {
    let mut out = format!("{ROLE}\n\n{RULES}\n");
    let _ = writeln!(
        out,
        "- Every deal needs asset_name, stage (Preclinical, Phase 1, Phase 2, Phase 3, \
         Filed or Approved), price_usd_m, date (YYYY-MM-DD), a rationale of at least \
         {MIN_RATIONALE_CHARS} characters, and at least one source URL."
    );

    if !config.defects.is_empty() {
        out.push_str("\nA previous answer was rejected for these defects. Fix every one:\n");
        for defect in &config.defects {
            let _ = writeln!(out, "- {defect}");
        }
    }
    if config.policy == EscalationPolicy::MaximalStrictness {
        out.push_str(
            "\nThis is the final attempt. Omit any deal you cannot fully source rather \
             than returning it incomplete.\n",
        );
    }
    out
}

/// Render the research question.
#[must_use]
pub fn input(spec: &RequestSpec) -> String {
    let depth = if spec.full_research() {
        "Perform full research: include the regulatory, IP and forecast blocks in detail."
    } else {
        "Perform focused research: market sizing, comparable deals and competition first."
    };
    format!(
        "Therapeutic area: {}\nIndication: {}\nTarget: {}\nGeography: {}\nDevelopment stage: {}\n\n{depth}",
        spec.therapeutic_area(),
        spec.indication(),
        spec.target(),
        spec.geography().label(),
        spec.stage().label(),
    )
}

/// Assemble a complete retrieval request.
#[must_use]
pub fn build_request(spec: &RequestSpec, config: RequestConfig) -> RetrievalRequest {
    RetrievalRequest {
        instructions: instructions(&config),
        input: input(spec),
        output_schema: output_schema(),
        config,
    }
}
