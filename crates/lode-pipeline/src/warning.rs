//! Non-fatal conditions reported alongside a successful response.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// The result was computed but not cached.
    CacheWrite(String),
    /// A cache lookup failed or returned an unreadable payload; the request
    /// was computed fresh.
    CacheRead(String),
    /// The audit record could not be written.
    Audit(String),
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheWrite(reason) => write!(f, "cache write skipped: {reason}"),
            Self::CacheRead(reason) => write!(f, "cache read failed: {reason}"),
            Self::Audit(reason) => write!(f, "audit write failed: {reason}"),
        }
    }
}
