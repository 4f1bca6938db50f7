//! Unified error types for the domain layer
//!
//! Every fallible domain operation returns [`DomainError`], so callers can
//! propagate ruleset problems with `?` instead of matching on strings.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., a slot table key outside the level range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A slot calculation was requested from a method that has no table.
    ///
    /// This is a ruleset authoring defect and should surface at setup time.
    #[error("No slot progression table was found for the '{method}' spellcasting")]
    MissingSlotTable { method: String },
}

impl DomainError {
    /// Creates a validation error for ruleset configuration problems.
    ///
    /// # Example
    /// ```ignore
    /// if mode.divisor == 0 {
    ///     return Err(DomainError::validation("progression divisor must be at least 1"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            key: key.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a missing slot table error
    pub fn missing_slot_table(method: impl Into<String>) -> Self {
        Self::MissingSlotTable {
            method: method.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("divisor cannot be zero");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: divisor cannot be zero");
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("SpellcastingMethod", "psionic");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("SpellcastingMethod"));
        assert!(err.to_string().contains("psionic"));
    }

    #[test]
    fn test_missing_slot_table_error() {
        let err = DomainError::missing_slot_table("pact");
        assert_eq!(
            err.to_string(),
            "No slot progression table was found for the 'pact' spellcasting"
        );
    }
}
