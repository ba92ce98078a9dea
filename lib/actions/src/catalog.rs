//! Action catalog: named, schema-constrained constructors.
//!
//! The catalog is an ordinary value built once at startup and handed to
//! whoever decodes actions. There is no process-wide registry.

use crate::action::{Action, NAME_FIELD};
use crate::error::{CatalogError, ValidationError};
use crate::schema::{validate, ActionSchema};
use roomchat_core::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A validated action record that has not been converted to a typed kind.
///
/// Produced by [`ActionConstructor::construct`]; catalogs may define kinds
/// the typed [`Action`] union does not know about.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawAction {
    name: String,
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl RawAction {
    /// The canonical name stamped by the constructor.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sanitized field values.
    #[must_use]
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Returns one field's value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Converts the record into the typed union.
    ///
    /// # Errors
    ///
    /// Fails when the name is not a built-in kind or a nested value does not
    /// fit the typed shape.
    pub fn into_typed(self) -> Result<Action, ValidationError> {
        Ok(Action::from_sanitized(&self.name, self.values)?)
    }
}

/// Builds actions of one kind.
#[derive(Debug, Clone)]
pub struct ActionConstructor {
    name: Arc<str>,
    schema: Arc<ActionSchema>,
}

impl ActionConstructor {
    /// The name every constructed action carries.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema values are validated against.
    #[must_use]
    pub fn schema(&self) -> &ActionSchema {
        &self.schema
    }

    /// Validates `values` and stamps the canonical name.
    ///
    /// Unknown fields are discarded. A field called `name` is replaced by
    /// the canonical name, whatever the caller put there.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] report when a required field is
    /// missing or any field has the wrong shape.
    pub fn construct(&self, values: &Map<String, Value>) -> Result<RawAction, ValidationError> {
        let mut values = validate(&self.name, &self.schema, values)?;
        if values.remove(NAME_FIELD).is_some() {
            tracing::debug!(action = %self.name, "caller-supplied name field replaced by canonical name");
        }
        Ok(RawAction {
            name: self.name.to_string(),
            values,
        })
    }
}

/// A registry of action constructors keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    constructors: HashMap<String, ActionConstructor>,
}

impl ActionCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding every built-in action kind.
    #[must_use]
    pub fn standard() -> Self {
        let constructors = Action::NAMES
            .iter()
            .filter_map(|name| {
                Action::schema_for(name).map(|schema| {
                    let constructor = ActionConstructor {
                        name: Arc::from(*name),
                        schema: Arc::new(schema),
                    };
                    ((*name).to_string(), constructor)
                })
            })
            .collect();
        Self { constructors }
    }

    /// Defines a new action kind and returns its constructor.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateDefinition`] if the name is taken.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        schema: ActionSchema,
    ) -> Result<ActionConstructor, CatalogError> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(CatalogError::DuplicateDefinition { name }.into());
        }

        let constructor = ActionConstructor {
            name: Arc::from(name.as_str()),
            schema: Arc::new(schema),
        };
        self.constructors.insert(name, constructor.clone());
        Ok(constructor)
    }

    /// Returns the constructor for `name`, if defined.
    #[must_use]
    pub fn constructor(&self, name: &str) -> Option<&ActionConstructor> {
        self.constructors.get(name)
    }

    /// Constructs the action called `name` from raw values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAction`] for undefined names and
    /// the constructor's validation errors otherwise.
    pub fn construct(
        &self,
        name: &str,
        values: &Map<String, Value>,
    ) -> Result<RawAction, ValidationError> {
        let constructor = self
            .constructor(name)
            .ok_or_else(|| ValidationError::UnknownAction {
                name: name.to_string(),
            })?;
        constructor.construct(values)
    }

    /// Decodes a serialized action record (a JSON object with a `name`).
    ///
    /// # Errors
    ///
    /// Fails when the record is not an object, has no string `name`, or
    /// does not validate.
    pub fn decode(&self, record: &Value) -> Result<Action, ValidationError> {
        let Value::Object(values) = record else {
            return Err(ValidationError::Malformed {
                action: String::new(),
                reason: format!("expected an object, got {}", crate::schema::json_type_name(record)),
            }
            .into());
        };
        let name = values
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| ValidationError::MissingField {
                action: String::new(),
                field: NAME_FIELD.to_string(),
            })?;
        self.construct(name, values)?.into_typed()
    }

    /// Number of defined kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if no kinds are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Names of every defined kind, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

/// Something that consumes dispatched actions, typically a store.
pub trait ActionHandler {
    /// Names of the actions this handler reacts to.
    fn subscribed_actions(&self) -> &[&'static str];

    /// Handles one action. Returns false if the action was ignored.
    fn handle(&mut self, action: &Action) -> bool;
}
