//! Research error taxonomy.

use std::fmt;

use lode_calc::CalcError;
use lode_core::{ClientInputError, ValidationIssue};
use lode_retrieval::TransportError;
use serde::Serialize;
use thiserror::Error;

/// Coarse error class for programmatic handling and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ClientInput,
    Transport,
    DataQuality,
    Computation,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientInput => "client_input",
            Self::Transport => "transport",
            Self::DataQuality => "data_quality",
            Self::Computation => "computation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ResearchError {
    /// The request itself is malformed; never retried.
    #[error("invalid request: {0}")]
    ClientInput(#[from] ClientInputError),

    /// The retrieval call failed, timed out, or returned unparseable output.
    #[error("retrieval failed [{trace_id}]: {source}")]
    Transport {
        trace_id: String,
        #[source]
        source: TransportError,
    },

    /// Quality issues persisted past the escalation budget, or a sanity
    /// rule was violated.
    #[error("data quality rejected after {attempts} attempt(s) [{trace_id}]: {} issue(s)", .issues.len())]
    DataQualityRejected {
        trace_id: String,
        attempts: u32,
        issues: Vec<ValidationIssue>,
    },

    /// Validated facts violated a calculator precondition. Indicates a
    /// validator/calculator mismatch.
    #[error("computation defect [{trace_id}]: {source}")]
    Computation {
        trace_id: String,
        #[source]
        source: CalcError,
    },
}

impl ResearchError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ClientInput(_) => ErrorCategory::ClientInput,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::DataQualityRejected { .. } => ErrorCategory::DataQuality,
            Self::Computation { .. } => ErrorCategory::Computation,
        }
    }

    /// The caller sent a bad request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientInput(_))
    }

    /// Retrying the same request later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The issue list of a rejection; empty for other variants.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::DataQualityRejected { issues, .. } => issues,
            _ => &[],
        }
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::ClientInput(_) => None,
            Self::Transport { trace_id, .. }
            | Self::DataQualityRejected { trace_id, .. }
            | Self::Computation { trace_id, .. } => Some(trace_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lode_core::IssueOrigin;

    #[test]
    fn categories_distinguish_caller_from_transient() {
        let client = ResearchError::from(ClientInputError::EmptyField { field: "target" });
        assert!(client.is_client_error());
        assert_eq!(client.trace_id(), None);

        let transport = ResearchError::Transport {
            trace_id: "t".into(),
            source: TransportError::Timeout { secs: 60 },
        };
        assert!(transport.is_transient());
        assert_eq!(transport.category(), ErrorCategory::Transport);
        assert!(transport.issues().is_empty());
    }

    #[test]
    fn rejection_exposes_issues() {
        let err = ResearchError::DataQualityRejected {
            trace_id: "t".into(),
            attempts: 3,
            issues: vec![ValidationIssue::error(
                IssueOrigin::Structural,
                "deals[0].price_usd_m",
                "missing price",
            )],
        };
        assert_eq!(err.category().as_str(), "data_quality");
        assert_eq!(err.issues().len(), 1);
        assert!(!err.is_transient());
        assert!(err.to_string().contains("3 attempt(s)"));
    }
}
