use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether an issue blocks acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Which quality stage produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueOrigin {
    Structural,
    Business,
    Sanity,
}

impl IssueOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Business => "business",
            Self::Sanity => "sanity",
        }
    }
}

/// A single quality finding against a facts payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationIssue {
    /// Dotted field path, e.g. `deals[2].price_usd_m`.
    pub path: String,
    pub message: String,
    pub severity: Severity,
    pub origin: IssueOrigin,
}

impl ValidationIssue {
    pub fn error(origin: IssueOrigin, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
            origin,
        }
    }

    pub fn warning(
        origin: IssueOrigin,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
            origin,
        }
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "[{level}/{}] {}: {}",
            self.origin.as_str(),
            self.path,
            self.message
        )
    }
}

/// True when any issue in the list blocks acceptance.
#[must_use]
pub fn has_blocking(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(ValidationIssue::is_blocking)
}

/// Split an issue list into (blocking, non-blocking), preserving order.
#[must_use]
pub fn partition(issues: Vec<ValidationIssue>) -> (Vec<ValidationIssue>, Vec<ValidationIssue>) {
    issues.into_iter().partition(ValidationIssue::is_blocking)
}
