//! # lode-retrieval
//!
//! The boundary to the external fact-retrieval service.
//!
//! - [`Retriever`]: the async trait the pipeline calls
//! - [`EscalationPolicy`]: ordered retry ladder producing a [`RequestConfig`]
//! - [`prompt`]: instruction and input rendering plus the output schema
//! - [`extract`]: tolerant JSON extraction from free-text answers
//! - [`HttpRetriever`]: the reqwest-backed client

mod client;
mod error;
pub mod extract;
mod http;
pub mod policy;
pub mod prompt;
mod retriever;

pub use client::{HttpRetriever, read_response, request_body};
pub use error::TransportError;
pub use extract::{extract_json, parse_facts};
pub use policy::{EscalationPolicy, ReasoningEffort, RequestConfig};
pub use prompt::build_request;
pub use retriever::{RetrievalRequest, RetrievalResponse, Retriever};
