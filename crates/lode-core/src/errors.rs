//! Client input error type.
//!
//! Pipeline, transport and storage errors live in their own crates and
//! converge in `lode-pipeline`'s `ResearchError`.

use thiserror::Error;

/// A malformed or out-of-range request. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientInputError {
    /// A required text field was empty after trimming.
    #[error("field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    /// A text field exceeded its maximum length.
    #[error("field '{field}' exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    /// The development stage label is not one of the six known stages.
    #[error("unknown development stage: '{0}'")]
    UnknownStage(String),

    /// The geography label is not recognized.
    #[error("unknown geography: '{0}'")]
    UnknownGeography(String),
}
