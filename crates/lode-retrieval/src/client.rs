//! HTTP client for a Responses-style research endpoint.

use async_trait::async_trait;
use lode_config::RetrievalConfig;
use lode_core::TokenUsage;
use serde_json::{Value, json};

use crate::error::TransportError;
use crate::http::check_response;
use crate::prompt::SCHEMA_NAME;
use crate::retriever::{RetrievalRequest, RetrievalResponse, Retriever};

/// [`Retriever`] that POSTs to the configured endpoint with bearer auth.
pub struct HttpRetriever {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpRetriever {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotConfigured`] when endpoint or key is
    /// missing, or [`TransportError::Http`] if the client cannot be built.
    pub fn new(config: &RetrievalConfig) -> Result<Self, TransportError> {
        if !config.is_configured() {
            return Err(TransportError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("lodestar/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResponse, TransportError> {
        let body = request_body(request);
        tracing::debug!(
            policy = %request.config.policy,
            model = %request.config.model,
            defects = request.config.defects.len(),
            "sending retrieval request"
        );
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let payload: Value = check_response(resp).await?.json().await?;
        read_response(&payload)
    }
}

/// The wire body for one request.
#[must_use]
pub fn request_body(request: &RetrievalRequest) -> Value {
    let config = &request.config;
    json!({
        "model": config.model,
        "instructions": request.instructions,
        "input": request.input,
        "reasoning": {"effort": config.reasoning_effort.as_str()},
        "temperature": config.temperature,
        "max_output_tokens": config.max_output_tokens,
        "tools": [{
            "type": "web_search",
            "search_context_size": config.search_context_size,
        }],
        "text": {
            "format": {
                "type": "json_schema",
                "name": SCHEMA_NAME,
                "schema": request.output_schema,
                "strict": config.strict_schema,
            }
        },
    })
}

/// Pull the answer text and token usage out of a response payload.
///
/// Prefers the flattened `output_text`; otherwise concatenates every
/// `output[].content[].text`.
///
/// # Errors
///
/// Returns [`TransportError::Malformed`] when the payload carries no text.
pub fn read_response(payload: &Value) -> Result<RetrievalResponse, TransportError> {
    let body = payload
        .get("output_text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            let parts: Vec<&str> = payload
                .get("output")?
                .as_array()?
                .iter()
                .filter_map(|item| item.get("content")?.as_array())
                .flatten()
                .filter_map(|content| content.get("text")?.as_str())
                .collect();
            (!parts.is_empty()).then(|| parts.concat())
        })
        .ok_or_else(|| TransportError::malformed("response carries no output text"))?;

    let usage = payload.get("usage").and_then(|u| {
        Some(TokenUsage {
            input_tokens: u.get("input_tokens")?.as_u64()?,
            output_tokens: u.get("output_tokens")?.as_u64()?,
        })
    });

    Ok(RetrievalResponse { body, usage })
}
