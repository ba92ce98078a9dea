//! Field schemas and the boundary validator.
//!
//! Every action kind declares which fields it requires, which it accepts
//! optionally, and the JSON shape each must have. [`validate`] checks raw
//! values against a schema and returns only the recognised fields.

use crate::error::ValidationError;
use serde_json::{Map, Value};
use std::fmt;

/// The expected shape of an action field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// Any object-like value (objects and arrays).
    Object,
    /// A JSON array.
    Array,
    /// An error-like object carrying a string `message`.
    Error,
    /// Any one of the listed shapes.
    OneOf(Vec<FieldType>),
}

impl FieldType {
    /// Returns true if `value` has this shape.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object() || value.is_array(),
            Self::Array => value.is_array(),
            Self::Error => value.get("message").is_some_and(Value::is_string),
            Self::OneOf(types) => types.iter().any(|ty| ty.accepts(value)),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object => write!(f, "object"),
            Self::Array => write!(f, "array"),
            Self::Error => write!(f, "error"),
            Self::OneOf(types) => {
                write!(f, "one of [")?;
                for (i, ty) in types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Name of the JSON type of `value`, for error messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The fields an action kind accepts.
///
/// An empty schema describes a signal action that carries no payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSchema {
    required: Vec<(String, FieldType)>,
    optional: Vec<(String, FieldType)>,
}

impl ActionSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    #[must_use]
    pub fn required(mut self, field: impl Into<String>, ty: FieldType) -> Self {
        self.required.push((field.into(), ty));
        self
    }

    /// Adds an optional field.
    #[must_use]
    pub fn optional(mut self, field: impl Into<String>, ty: FieldType) -> Self {
        self.optional.push((field.into(), ty));
        self
    }

    /// Returns true if this schema accepts no fields at all.
    #[must_use]
    pub fn is_signal(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    /// Iterates over the required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.required.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Iterates over the optional fields.
    pub fn optional_fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.optional.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Looks up the declared type of a field.
    #[must_use]
    pub fn field_type(&self, field: &str) -> Option<&FieldType> {
        self.required
            .iter()
            .chain(&self.optional)
            .find(|(name, _)| name == field)
            .map(|(_, ty)| ty)
    }
}

/// Validates `values` against `schema` for the action called `action`.
///
/// Returns a new map holding only the schema's fields. Null counts as
/// absent: a null required field is missing, a null optional field is
/// dropped.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when a required field is absent
/// and [`ValidationError::InvalidType`] when any present field has the wrong
/// shape.
pub fn validate(
    action: &str,
    schema: &ActionSchema,
    values: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut sanitized = Map::new();

    for (field, ty) in schema.required_fields() {
        match values.get(field) {
            None | Some(Value::Null) => {
                return Err(ValidationError::MissingField {
                    action: action.to_string(),
                    field: field.to_string(),
                });
            }
            Some(value) => {
                check_type(action, field, ty, value)?;
                sanitized.insert(field.to_string(), value.clone());
            }
        }
    }

    for (field, ty) in schema.optional_fields() {
        if let Some(value) = values.get(field).filter(|v| !v.is_null()) {
            check_type(action, field, ty, value)?;
            sanitized.insert(field.to_string(), value.clone());
        }
    }

    if sanitized.len() < values.len() {
        let dropped: Vec<&str> = values
            .keys()
            .filter(|key| !sanitized.contains_key(key.as_str()))
            .map(String::as_str)
            .collect();
        tracing::trace!(action, ?dropped, "discarded unrecognised fields");
    }

    Ok(sanitized)
}

fn check_type(
    action: &str,
    field: &str,
    ty: &FieldType,
    value: &Value,
) -> Result<(), ValidationError> {
    if ty.accepts(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidType {
            action: action.to_string(),
            field: field.to_string(),
            expected: ty.clone(),
            got: json_type_name(value),
        })
    }
}
