//! # lode-core
//!
//! Core types shared across all Lodestar crates.
//!
//! This crate provides:
//! - The normalized, immutable [`RequestSpec`] and its enumerations
//! - The retrieval payload model ([`facts::RawFacts`], [`facts::DealRecord`])
//!   with lenient numeric decoding
//! - The typed, fully-populated [`deal::Deal`]
//! - Validation issues, derived metrics, usage accounting and the merged
//!   research result
//! - Audit records and the client-input error type

pub mod audit;
pub mod deal;
pub mod derived;
pub mod enums;
pub mod errors;
pub mod facts;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod issues;
pub mod lenient;
pub mod request;
pub mod result;

pub use deal::{Deal, DealDefect};
pub use derived::DerivedFacts;
pub use enums::{DevelopmentStage, Geography};
pub use errors::ClientInputError;
pub use facts::RawFacts;
pub use issues::{IssueOrigin, Severity, ValidationIssue};
pub use request::RequestSpec;
pub use result::{ResearchResult, TokenUsage, UsageLedger};
