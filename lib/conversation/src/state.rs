//! Conversation state snapshots.
//!
//! A snapshot is never modified after the store publishes it. Readers may
//! hold on to one for as long as they like; the store publishes a fresh one
//! for every change.

use crate::message::{ContentType, Message};
use serde::Serialize;
use std::sync::Arc;

/// The chat transcript and its surrounding room state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// Whether a data channel is available for text chat.
    pub chat_enabled: bool,
    /// Transcript in handling order.
    pub messages: Arc<[Message]>,
    /// The room's name, once known.
    pub room_name: Option<String>,
    /// The local user's chosen name.
    pub display_name: Option<String>,
}

impl ConversationState {
    /// Returns the number of messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the last message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the messages of one content type, oldest first.
    pub fn messages_of<'a>(
        &'a self,
        content_type: &'a ContentType,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages
            .iter()
            .filter(move |m| &m.content_type == content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn initial_state_is_empty_and_disabled() {
        let state = ConversationState::default();
        assert!(!state.chat_enabled);
        assert_eq!(state.message_count(), 0);
        assert!(state.room_name.is_none());
        assert!(state.display_name.is_none());
        assert!(state.last_message().is_none());
    }

    #[test]
    fn messages_of_filters_by_content_type() {
        let state = ConversationState {
            messages: vec![
                Message::new(MessageKind::Received, ContentType::Text, "one"),
                Message::new(MessageKind::Received, ContentType::Notification, "peer_join_session"),
                Message::new(MessageKind::Sent, ContentType::Text, "two"),
            ]
            .into(),
            ..ConversationState::default()
        };

        let texts: Vec<&str> = state
            .messages_of(&ContentType::Text)
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(state.last_message().map(|m| m.message.as_str()), Some("two"));
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = ConversationState {
            chat_enabled: true,
            room_name: Some("Lounge".to_string()),
            ..ConversationState::default()
        };
        let json = serde_json::to_value(&state).expect("serialize");
        assert_eq!(json["chatEnabled"], true);
        assert_eq!(json["roomName"], "Lounge");
        assert_eq!(json["messages"], serde_json::json!([]));
    }
}
