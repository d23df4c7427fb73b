//! Enumerations for request categories.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Parsing from user or retrieval text is lenient (case, spacing, roman
//! numerals and common abbreviations are accepted) through [`FromStr`].

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::ClientInputError;

/// Collapse a label to lowercase alphanumerics for lenient matching.
fn squash(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// DevelopmentStage
// ---------------------------------------------------------------------------

/// Clinical development stage of an asset.
///
/// Shared by request specs and deal records; the fixed six-value set is the
/// enumeration deal stages are validated against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentStage {
    Preclinical,
    Phase1,
    Phase2,
    Phase3,
    Filed,
    Approved,
}

impl DevelopmentStage {
    pub const ALL: [Self; 6] = [
        Self::Preclinical,
        Self::Phase1,
        Self::Phase2,
        Self::Phase3,
        Self::Filed,
        Self::Approved,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preclinical => "preclinical",
            Self::Phase1 => "phase1",
            Self::Phase2 => "phase2",
            Self::Phase3 => "phase3",
            Self::Filed => "filed",
            Self::Approved => "approved",
        }
    }

    /// Human-facing label, e.g. `"Phase 3"`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preclinical => "Preclinical",
            Self::Phase1 => "Phase 1",
            Self::Phase2 => "Phase 2",
            Self::Phase3 => "Phase 3",
            Self::Filed => "Filed",
            Self::Approved => "Approved",
        }
    }
}

impl fmt::Display for DevelopmentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DevelopmentStage {
    type Err = ClientInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "preclinical" | "discovery" | "ind" | "indenabling" => Ok(Self::Preclinical),
            "phase1" | "phasei" | "p1" | "ph1" => Ok(Self::Phase1),
            "phase2" | "phaseii" | "p2" | "ph2" => Ok(Self::Phase2),
            "phase3" | "phaseiii" | "p3" | "ph3" | "pivotal" => Ok(Self::Phase3),
            "filed" | "submitted" | "registration" | "nda" | "bla" | "maa" => Ok(Self::Filed),
            "approved" | "marketed" | "launched" => Ok(Self::Approved),
            _ => Err(ClientInputError::UnknownStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// Market geography a request is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Geography {
    Global,
    UnitedStates,
    Europe,
    Japan,
    China,
}

impl Geography {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::UnitedStates => "united_states",
            Self::Europe => "europe",
            Self::Japan => "japan",
            Self::China => "china",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::UnitedStates => "United States",
            Self::Europe => "Europe",
            Self::Japan => "Japan",
            Self::China => "China",
        }
    }
}

impl fmt::Display for Geography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Geography {
    type Err = ClientInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match squash(s).as_str() {
            "global" | "worldwide" | "ww" => Ok(Self::Global),
            "us" | "usa" | "unitedstates" => Ok(Self::UnitedStates),
            "eu" | "europe" | "eu5" => Ok(Self::Europe),
            "jp" | "japan" => Ok(Self::Japan),
            "cn" | "china" => Ok(Self::China),
            _ => Err(ClientInputError::UnknownGeography(s.to_string())),
        }
    }
}
