//! Calculator error types.

use thiserror::Error;

/// Domain violations of the cross-field calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// An argument lies outside the function's documented domain.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Vectors of different lengths were compared.
    #[error("vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// A vector argument was empty.
    #[error("empty input vector")]
    EmptyInput,

    /// A required facts field was absent when deriving metrics.
    #[error("missing input field '{field}'")]
    MissingInput { field: &'static str },
}

impl CalcError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
