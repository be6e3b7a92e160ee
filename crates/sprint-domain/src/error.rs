//! Validation error for untrusted input

use thiserror::Error;

/// Malformed or out-of-range input, usually from an external collaborator
/// or a user form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationInputError {
    /// Fit score outside the 0-100 range
    #[error("Fit score {raw} is outside [0, 100]")]
    ScoreOutOfRange {
        /// The score as received
        raw: i64,
    },

    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A field was present but could not be interpreted
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// What was wrong with it
        reason: String,
    },
}

impl ValidationInputError {
    /// Shorthand for [`ValidationInputError::InvalidValue`]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
