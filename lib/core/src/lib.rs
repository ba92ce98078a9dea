//! Core domain types and utilities for roomchat.
//!
//! This crate provides the foundational types and error handling shared by
//! the action catalog and the conversation store.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ConversationId, MessageId, ParseIdError};
