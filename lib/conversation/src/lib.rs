//! Conversation store for roomchat.
//!
//! This crate provides:
//!
//! - **Messages**: transcript entries and their content types
//! - **State**: immutable snapshots of a conversation
//! - **Store**: the action handler that owns a conversation's transcript
//! - **Drivers**: the outbound seams for sending chat and notifying the host

pub mod config;
pub mod driver;
pub mod error;
pub mod message;
pub mod state;
pub mod store;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod testing;

pub use config::ConversationConfig;
pub use driver::{ChatPayload, DataDriver, HostNotification, HostNotifier};
pub use error::ConfigurationError;
pub use message::{ContentType, Message, MessageKind};
pub use state::ConversationState;
pub use store::{ConversationStore, ConversationStoreBuilder};
