//! # lode-pipeline
//!
//! Orchestration for Lodestar research requests.
//!
//! - [`Orchestrator`] runs the fetch/validate/repair/escalate state machine
//!   for one request and reports every [`PipelineState`] it visited
//! - [`ResearchService`] adds fingerprinting, the result cache and the
//!   audit log around it
//! - [`ResearchError`] is the caller-facing error taxonomy

pub mod error;
pub mod orchestrator;
pub mod service;
pub mod state;
pub mod warning;

pub use error::{ErrorCategory, ResearchError};
pub use orchestrator::{Orchestrator, RunReport};
pub use service::{RequestOptions, ResearchResponse, ResearchService, request_fingerprint};
pub use state::PipelineState;
pub use warning::PipelineWarning;
