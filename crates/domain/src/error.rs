//! Unified error types for the domain layer
//!
//! Provides a common error type for value-object construction and sheet
//! arithmetic, so the client layer can wrap it without resorting to strings.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A sheet cell holds a value its consumer cannot use
    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },
}

impl DomainError {
    /// Creates a validation error for rule violations.
    ///
    /// Use this when domain invariants are violated:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    /// - A patch tries to change an immutable key
    ///
    /// # Example
    /// ```ignore
    /// if slug.is_empty() {
    ///     return Err(DomainError::validation("Slug cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid sheet field error
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("slug cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: slug cannot be empty");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown ability: Luck");
        assert!(matches!(err, DomainError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: Unknown ability: Luck");
    }

    #[test]
    fn test_invalid_field_error() {
        let err = DomainError::invalid_field("Charismascore", "expected an integer, got \"abc\"");
        assert!(matches!(err, DomainError::InvalidField { ref field, .. } if field == "Charismascore"));
        assert_eq!(
            err.to_string(),
            "Invalid value for Charismascore: expected an integer, got \"abc\""
        );
    }
}
