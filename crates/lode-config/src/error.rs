//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider failed to load or the merged value did not fit the schema.
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// A section is missing a field required for the requested operation.
    #[error("'{section}' is missing '{field}'")]
    Incomplete {
        section: &'static str,
        field: &'static str,
    },

    /// A field holds a value outside its accepted range.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}
