use serde::{Deserialize, Serialize};

use crate::enums::{DevelopmentStage, Geography};
use crate::errors::ClientInputError;

/// Maximum length of any free-text request field.
pub const MAX_FIELD_LEN: usize = 200;

/// A normalized research request.
///
/// Fields are private: a `RequestSpec` can only be produced by
/// [`RequestSpec::new`] (or deserialization, which routes through it), so
/// every instance is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RequestSpecInput")]
pub struct RequestSpec {
    therapeutic_area: String,
    indication: String,
    target: String,
    geography: Geography,
    stage: DevelopmentStage,
    full_research: bool,
}

/// Unchecked wire form of [`RequestSpec`].
#[derive(Debug, Clone, Deserialize)]
struct RequestSpecInput {
    therapeutic_area: String,
    indication: String,
    target: String,
    geography: Geography,
    stage: DevelopmentStage,
    #[serde(default)]
    full_research: bool,
}

impl TryFrom<RequestSpecInput> for RequestSpec {
    type Error = ClientInputError;

    fn try_from(input: RequestSpecInput) -> Result<Self, Self::Error> {
        Self::new(
            &input.therapeutic_area,
            &input.indication,
            &input.target,
            input.geography,
            input.stage,
            input.full_research,
        )
    }
}

fn normalize(field: &'static str, value: &str) -> Result<String, ClientInputError> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(ClientInputError::EmptyField { field });
    }
    if collapsed.chars().count() > MAX_FIELD_LEN {
        return Err(ClientInputError::FieldTooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(collapsed)
}

impl RequestSpec {
    /// Build a normalized request. Text fields are trimmed and internal
    /// whitespace runs collapsed; category strings are otherwise opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ClientInputError`] if a text field is empty or too long.
    pub fn new(
        therapeutic_area: &str,
        indication: &str,
        target: &str,
        geography: Geography,
        stage: DevelopmentStage,
        full_research: bool,
    ) -> Result<Self, ClientInputError> {
        Ok(Self {
            therapeutic_area: normalize("therapeutic_area", therapeutic_area)?,
            indication: normalize("indication", indication)?,
            target: normalize("target", target)?,
            geography,
            stage,
            full_research,
        })
    }

    #[must_use]
    pub fn therapeutic_area(&self) -> &str {
        &self.therapeutic_area
    }

    #[must_use]
    pub fn indication(&self) -> &str {
        &self.indication
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn geography(&self) -> Geography {
        self.geography
    }

    #[must_use]
    pub const fn stage(&self) -> DevelopmentStage {
        self.stage
    }

    #[must_use]
    pub const fn full_research(&self) -> bool {
        self.full_research
    }

    /// One-line description used in prompts and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} / {} / {} ({}, {})",
            self.therapeutic_area, self.indication, self.target, self.geography, self.stage
        )
    }
}
