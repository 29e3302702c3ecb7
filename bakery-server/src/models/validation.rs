//! Validation error types

use std::fmt;

/// Validation error for request payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are absent or blank.
    ///
    /// Carries the full list of required fields so the message is stable
    /// regardless of which one was missing.
    MissingFields { fields: &'static [&'static str] },

    /// A single required field is absent or blank
    MissingField { label: &'static str },

    /// Field exceeds its column width
    TooLong { field: &'static str, max: usize },

    /// Numeric field below its minimum
    OutOfRange { field: &'static str, min: i64 },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields { fields } => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            Self::MissingField { label } => write!(f, "{} is required", label),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::OutOfRange { field, min } => write!(f, "{} must be at least {}", field, min),
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
