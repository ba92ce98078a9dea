//! Transcript messages.

use chrono::{DateTime, Utc};
use roomchat_core::MessageId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Who a transcript entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Written by the local user.
    #[serde(rename = "sent")]
    Sent,
    /// Arrived from the remote peer, or generated about it.
    #[serde(rename = "recv")]
    Received,
    /// Room metadata rendered inline (shared-link context).
    #[serde(rename = "special")]
    Special,
}

/// What a message's body and extra data mean.
///
/// Unrecognised content types are kept verbatim so that newer peers can
/// send kinds this version skips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// Plain chat text.
    Text,
    /// A room name change.
    RoomName,
    /// Room-level shared-link metadata; at most one per transcript.
    Context,
    /// A shared browser tab or page.
    ContextTile,
    /// A localised status line, e.g. a peer joining.
    Notification,
    /// Anything else.
    Other(String),
}

impl ContentType {
    /// The wire name of this content type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "chat-text",
            Self::RoomName => "room-name",
            Self::Context => "chat-context",
            Self::ContextTile => "context-tile",
            Self::Notification => "chat-notification",
            Self::Other(raw) => raw,
        }
    }

    /// Returns true for content types peers may send us.
    #[must_use]
    pub fn is_receivable(&self) -> bool {
        matches!(self, Self::Text | Self::ContextTile | Self::Notification)
    }
}

impl From<&str> for ContentType {
    fn from(raw: &str) -> Self {
        match raw {
            "chat-text" => Self::Text,
            "room-name" => Self::RoomName,
            "chat-context" => Self::Context,
            "context-tile" => Self::ContextTile,
            "chat-notification" => Self::Notification,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ContentType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts an epoch-milliseconds action timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if millis.is_finite() {
        DateTime::from_timestamp_millis(millis as i64)
    } else {
        None
    }
}

/// The current time as epoch milliseconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn now_millis() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// One transcript entry.
///
/// Messages are never edited once appended; replacing the room context
/// swaps in a new message at the same position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Who the message is attributed to.
    pub kind: MessageKind,
    /// How to interpret the body.
    pub content_type: ContentType,
    /// Message body: chat text, a page description, or a notification key.
    pub message: String,
    /// Auxiliary payload whose shape depends on the content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<JsonValue>,
    /// When the sender sent it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// When it arrived here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    /// Sender's display name, for chat text only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(kind: MessageKind, content_type: ContentType, message: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            kind,
            content_type,
            message: message.into(),
            extra_data: None,
            sent_at: None,
            received_at: None,
            display_name: None,
        }
    }

    /// Creates a notification about the remote peer.
    #[must_use]
    pub fn peer_notification(key: &str, peer_status: &str) -> Self {
        Self::new(MessageKind::Received, ContentType::Notification, key)
            .with_extra_data(serde_json::json!({ "peerStatus": peer_status }))
            .with_received_at(Some(Utc::now()))
    }

    /// Sets the extra data.
    #[must_use]
    pub fn with_extra_data(mut self, extra_data: JsonValue) -> Self {
        self.extra_data = Some(extra_data);
        self
    }

    /// Sets the send time.
    #[must_use]
    pub fn with_sent_at(mut self, sent_at: Option<DateTime<Utc>>) -> Self {
        self.sent_at = sent_at;
        self
    }

    /// Sets the arrival time.
    #[must_use]
    pub fn with_received_at(mut self, received_at: Option<DateTime<Utc>>) -> Self {
        self.received_at = received_at;
        self
    }

    /// Attributes the message to a named sender.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Reads a string field out of the extra data.
    #[must_use]
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra_data.as_ref()?.get(key)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_parse_from_wire_names() {
        assert_eq!(ContentType::from("chat-text"), ContentType::Text);
        assert_eq!(ContentType::from("context-tile"), ContentType::ContextTile);
        assert_eq!(
            ContentType::from("hologram"),
            ContentType::Other("hologram".to_string())
        );
    }

    #[test]
    fn unknown_content_type_survives_serialization() {
        let json = serde_json::to_string(&ContentType::from("hologram")).expect("serialize");
        assert_eq!(json, "\"hologram\"");
        let back: ContentType = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ContentType::Other("hologram".to_string()));
    }

    #[test]
    fn only_text_tiles_and_notifications_are_receivable() {
        assert!(ContentType::Text.is_receivable());
        assert!(ContentType::ContextTile.is_receivable());
        assert!(ContentType::Notification.is_receivable());
        assert!(!ContentType::Context.is_receivable());
        assert!(!ContentType::RoomName.is_receivable());
        assert!(!ContentType::from("hologram").is_receivable());
    }

    #[test]
    fn message_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&MessageKind::Received).expect("serialize"),
            "\"recv\""
        );
        assert_eq!(
            serde_json::to_string(&MessageKind::Special).expect("serialize"),
            "\"special\""
        );
    }

    #[test]
    fn peer_notification_carries_status() {
        let msg = Message::peer_notification("peer_join_session", "connected");
        assert_eq!(msg.kind, MessageKind::Received);
        assert_eq!(msg.content_type, ContentType::Notification);
        assert_eq!(msg.message, "peer_join_session");
        assert_eq!(msg.extra_str("peerStatus"), Some("connected"));
        assert!(msg.received_at.is_some());
    }

    #[test]
    fn timestamps_convert_from_millis() {
        let at = timestamp_from_millis(1_000.0).expect("valid");
        assert_eq!(at.timestamp(), 1);
        assert_eq!(timestamp_from_millis(f64::NAN), None);
    }

    #[test]
    fn message_serializes_camel_case_without_absent_fields() {
        let msg = Message::new(MessageKind::Sent, ContentType::Text, "hi")
            .with_display_name(Some("Ada".to_string()));
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["contentType"], "chat-text");
        assert_eq!(json["displayName"], "Ada");
        assert!(json.get("extraData").is_none());
    }
}
