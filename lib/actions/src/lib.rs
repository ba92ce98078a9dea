//! Action catalog for roomchat.
//!
//! This crate provides:
//!
//! - **Schemas**: per-kind field shapes and the boundary validator
//! - **Actions**: the closed, typed union of every action kind
//! - **Catalog**: a registry of named constructors for untyped input

pub mod action;
pub mod catalog;
pub mod error;
pub mod schema;

pub use action::{Action, RoomContextUrl, NAME_FIELD};
pub use catalog::{ActionCatalog, ActionConstructor, ActionHandler, RawAction};
pub use error::{CatalogError, ValidationError};
pub use schema::{validate, ActionSchema, FieldType};
