//! Core error types.

use thiserror::Error;

/// Result alias for core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal generation errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A relation field points at a model missing from the registry.
    #[error(transparent)]
    DanglingRelation(#[from] DanglingRelationError),

    /// The schema document could not be decoded.
    #[error("invalid schema document: {0}")]
    InvalidSchema(#[from] serde_json::Error),

    /// A generator option carries an unsupported value.
    #[error("'{value}' is not a valid {option}. Valid options are {expected}.")]
    InvalidOption {
        /// Option name as written in the generator block.
        option: String,
        /// Offending value.
        value: String,
        /// Human-readable list of accepted values.
        expected: String,
    },

    /// Two generator options cannot be combined.
    #[error("{0}")]
    ConflictingOptions(String),
}

/// A relation whose target model is absent from the registry.
///
/// Generation for the run is aborted rather than emitting a reference to
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct DanglingRelationError {
    /// Model declaring the relation.
    pub model: String,
    /// Relation field name.
    pub field: String,
    /// Missing target model name.
    pub target: String,
    /// Whether the target was dropped by `@DtoIgnoreModel`.
    pub ignored: bool,
}

impl std::fmt::Display for DanglingRelationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "relation field '{}.{}' targets unknown model '{}'",
            self.model, self.field, self.target
        )?;
        if self.ignored {
            write!(f, " (excluded by @DtoIgnoreModel)")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create an invalid option error.
    pub fn invalid_option(
        option: impl Into<String>,
        value: impl Into<String>,
        expected: &[&str],
    ) -> Self {
        let expected = expected
            .iter()
            .map(|v| format!("'{}'", v))
            .collect::<Vec<_>>()
            .join(", ");
        Error::InvalidOption {
            option: option.into(),
            value: value.into(),
            expected,
        }
    }
}
