use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::RequestSpec;

/// How a research request ended, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Computed,
    CacheHit,
    Rejected,
    Failed,
}

impl AuditOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computed => "computed",
            Self::CacheHit => "cache_hit",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "computed" => Ok(Self::Computed),
            "cache_hit" => Ok(Self::CacheHit),
            "rejected" => Ok(Self::Rejected),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown audit outcome '{other}'")),
        }
    }
}

/// An append-only audit entry for one research request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub trace_id: String,
    pub fingerprint: String,
    pub request: RequestSpec,
    pub model: String,
    pub duration_ms: u64,
    pub source_count: u32,
    pub retrieval_calls: u32,
    pub outcome: AuditOutcome,
    pub created_at: DateTime<Utc>,
}
