//! The retrieval service boundary.

use std::sync::Arc;

use async_trait::async_trait;
use lode_core::TokenUsage;
use serde_json::Value;

use crate::error::TransportError;
use crate::policy::RequestConfig;

/// Everything sent to the retrieval service for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalRequest {
    /// System-level instructions, including any prior defects.
    pub instructions: String,
    /// The research question itself.
    pub input: String,
    /// JSON Schema the answer must conform to.
    pub output_schema: Value,
    pub config: RequestConfig,
}

/// The raw answer of one call; parsing is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalResponse {
    pub body: String,
    /// `None` when the service did not report token counts.
    pub usage: Option<TokenUsage>,
}

/// A source of structured research answers.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, request: &RetrievalRequest)
    -> Result<RetrievalResponse, TransportError>;
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for Arc<T> {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResponse, TransportError> {
        (**self).retrieve(request).await
    }
}
