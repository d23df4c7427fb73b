//! Orchestrator states.
//!
//! ```text
//! idle → fetching → validating → sanity_checking → computing → done
//!                   validating → repairing → validating
//!                   validating → escalating → fetching
//!        fetching | validating → failed
//!                   validating | sanity_checking → rejected
//!                                computing → failed
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Fetching,
    Validating,
    Repairing,
    Escalating,
    SanityChecking,
    Computing,
    Done,
    Rejected,
    Failed,
}

impl PipelineState {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Fetching],
            Self::Fetching => &[Self::Validating, Self::Failed],
            Self::Validating => &[
                Self::SanityChecking,
                Self::Repairing,
                Self::Escalating,
                Self::Rejected,
                Self::Failed,
            ],
            Self::Repairing => &[Self::Validating],
            Self::Escalating => &[Self::Fetching],
            Self::SanityChecking => &[Self::Computing, Self::Rejected],
            Self::Computing => &[Self::Done, Self::Failed],
            Self::Done | Self::Rejected | Self::Failed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Rejected | Self::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Validating => "validating",
            Self::Repairing => "repairing",
            Self::Escalating => "escalating",
            Self::SanityChecking => "sanity_checking",
            Self::Computing => "computing",
            Self::Done => "done",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
