//! Error types for the actions crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ValidationError`: raw values did not satisfy an action's schema
//! - `CatalogError`: registry definitions

use crate::schema::FieldType;
use std::fmt;

/// Errors from validating raw values against an action schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or null.
    MissingField { action: String, field: String },
    /// A field was present with a value of the wrong type.
    InvalidType {
        action: String,
        field: String,
        expected: FieldType,
        got: &'static str,
    },
    /// No action with this name is known.
    UnknownAction { name: String },
    /// Values passed the schema but did not fit the typed shape.
    Malformed { action: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { action, field } => {
                write!(f, "missing required field '{field}' for action '{action}'")
            }
            Self::InvalidType {
                action,
                field,
                expected,
                got,
            } => write!(
                f,
                "invalid field '{field}' for action '{action}': expected {expected}, got {got}"
            ),
            Self::UnknownAction { name } => write!(f, "unknown action: {name}"),
            Self::Malformed { action, reason } => {
                write!(f, "malformed action '{action}': {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors from catalog operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An action with this name was already defined.
    DuplicateDefinition { name: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDefinition { name } => {
                write!(f, "action '{name}' is already defined")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display() {
        let err = ValidationError::MissingField {
            action: "setMute".to_string(),
            field: "enabled".to_string(),
        };
        assert!(err.to_string().contains("missing required field 'enabled'"));
    }

    #[test]
    fn invalid_type_display_names_both_types() {
        let err = ValidationError::InvalidType {
            action: "setMute".to_string(),
            field: "enabled".to_string(),
            expected: FieldType::Boolean,
            got: "string",
        };
        let text = err.to_string();
        assert!(text.contains("expected boolean"));
        assert!(text.contains("got string"));
    }

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::DuplicateDefinition {
            name: "leaveRoom".to_string(),
        };
        assert!(err.to_string().contains("leaveRoom"));
    }
}
