//! Seams to the outside: sending chat payloads and notifying the host.

use crate::message::ContentType;
use roomchat_actions::action::ReceivedTextChatMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// A chat message as it travels over the data channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    /// How to interpret the body.
    pub content_type: ContentType,
    /// Message body.
    pub message: String,
    /// Auxiliary payload, e.g. a context tile's page data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<JsonValue>,
    /// Send time in epoch milliseconds.
    pub sent_timestamp: f64,
    /// Sender's display name; attached to chat text only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ChatPayload {
    /// The action the receiving side dispatches for this payload.
    #[must_use]
    pub fn into_received(self, received_timestamp: f64) -> ReceivedTextChatMessage {
        ReceivedTextChatMessage {
            content_type: self.content_type.into(),
            message: self.message,
            received_timestamp,
            display_name: self.display_name,
            sent_timestamp: Some(self.sent_timestamp),
            extra_data: self.extra_data,
        }
    }
}

/// Transmits chat payloads to the remote peer.
///
/// Sending is fire-and-forget: delivery and failures are the driver's
/// concern.
pub trait DataDriver: Send + Sync {
    /// Sends one payload.
    fn send_text_chat_message(&self, payload: &ChatPayload);
}

/// Signals the store raises for the surrounding host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostNotification {
    /// A data channel became available.
    ChatEnabled,
    /// A visible message was appended while chat is enabled.
    MessageAppendedEnabled,
    /// A visible message was appended while chat is disabled, so the host
    /// may want to surface an indicator.
    MessageAppendedDisabled,
}

impl HostNotification {
    /// The signal's name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatEnabled => "chat-enabled",
            Self::MessageAppendedEnabled => "message-appended-enabled",
            Self::MessageAppendedDisabled => "message-appended-disabled",
        }
    }
}

impl fmt::Display for HostNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives [`HostNotification`]s.
pub trait HostNotifier: Send + Sync {
    /// Delivers one notification.
    fn notify(&self, notification: HostNotification);
}
