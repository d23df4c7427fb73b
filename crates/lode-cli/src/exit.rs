//! Process exit codes.

use lode_core::ClientInputError;
use lode_pipeline::{ErrorCategory, ResearchError};

pub const GENERIC: i32 = 1;
pub const CLIENT_INPUT: i32 = 2;
pub const TRANSPORT: i32 = 3;
pub const REJECTED: i32 = 4;
pub const COMPUTATION: i32 = 5;

const fn for_category(category: ErrorCategory) -> i32 {
    match category {
        ErrorCategory::ClientInput => CLIENT_INPUT,
        ErrorCategory::Transport => TRANSPORT,
        ErrorCategory::DataQuality => REJECTED,
        ErrorCategory::Computation => COMPUTATION,
    }
}

/// Exit code for an error returned by a command handler.
pub fn code_for(error: &anyhow::Error) -> i32 {
    if let Some(research) = error.downcast_ref::<ResearchError>() {
        return for_category(research.category());
    }
    if error.downcast_ref::<ClientInputError>().is_some() {
        return CLIENT_INPUT;
    }
    GENERIC
}

#[cfg(test)]
mod tests {
    use lode_retrieval::TransportError;

    use super::*;

    #[test]
    fn research_errors_map_by_category() {
        let transport = anyhow::Error::new(ResearchError::Transport {
            trace_id: "t".into(),
            source: TransportError::Timeout { secs: 60 },
        });
        assert_eq!(code_for(&transport), TRANSPORT);

        let rejected = anyhow::Error::new(ResearchError::DataQualityRejected {
            trace_id: "t".into(),
            attempts: 3,
            issues: Vec::new(),
        });
        assert_eq!(code_for(&rejected), REJECTED);
    }

    #[test]
    fn bare_client_input_is_a_client_error() {
        let err = anyhow::Error::new(ClientInputError::UnknownStage("Phase 4".into()));
        assert_eq!(code_for(&err), CLIENT_INPUT);
        assert_eq!(code_for(&anyhow::anyhow!("store unavailable")), GENERIC);
    }
}
