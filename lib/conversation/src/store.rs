//! The conversation store.
//!
//! Owns the chat transcript for one conversation and mutates it in response
//! to dispatched actions. Each handler runs to completion before the next
//! action is handled; every change publishes a new [`ConversationState`]
//! snapshot and leaves previously handed-out snapshots untouched.

use crate::config::ConversationConfig;
use crate::driver::{ChatPayload, DataDriver, HostNotification, HostNotifier};
use crate::error::ConfigurationError;
use crate::message::{ContentType, Message, MessageKind, now_millis, timestamp_from_millis};
use crate::state::ConversationState;
use roomchat_actions::action::{
    DataChannelsAvailable, ReceivedTextChatMessage, RemotePeerConnected, RemotePeerDisconnected,
    SendTextChatMessage, SetOwnDisplayName, UpdateRoomContext, UpdateRoomInfo,
};
use roomchat_actions::{Action, ActionHandler};
use roomchat_core::{ConversationId, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, trace};
use url::Url;

/// Positions of messages the store needs to find again.
///
/// Messages are only ever appended or replaced in place, so positions stay
/// valid for the life of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TranscriptIndex {
    /// The single CONTEXT message, if any.
    context: Option<usize>,
    /// The most recent CONTEXT_TILE message, if any.
    last_context_tile: Option<usize>,
}

/// Holds one conversation's transcript and room state.
pub struct ConversationStore {
    id: ConversationId,
    config: ConversationConfig,
    data_driver: Arc<dyn DataDriver>,
    notifier: Option<Arc<dyn HostNotifier>>,
    state: Arc<ConversationState>,
    index: TranscriptIndex,
}

impl fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationStore")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`ConversationStore`].
#[derive(Default)]
pub struct ConversationStoreBuilder {
    id: Option<ConversationId>,
    config: ConversationConfig,
    data_driver: Option<Arc<dyn DataDriver>>,
    notifier: Option<Arc<dyn HostNotifier>>,
}

impl ConversationStoreBuilder {
    /// Sets the conversation id used in log spans. Defaults to a fresh id.
    #[must_use]
    pub fn id(mut self, id: ConversationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the store configuration.
    #[must_use]
    pub fn config(mut self, config: ConversationConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the driver outgoing messages are sent through. Required.
    #[must_use]
    pub fn data_driver(mut self, data_driver: Arc<dyn DataDriver>) -> Self {
        self.data_driver = Some(data_driver);
        self
    }

    /// Sets the receiver of host notifications. Without one, notifications
    /// are only logged.
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn HostNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the store with an empty transcript and chat disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingDataDriver`] if no data driver
    /// was set.
    pub fn build(self) -> Result<ConversationStore, ConfigurationError> {
        let data_driver = self
            .data_driver
            .ok_or(ConfigurationError::MissingDataDriver)?;
        Ok(ConversationStore {
            id: self.id.unwrap_or_default(),
            config: self.config,
            data_driver,
            notifier: self.notifier,
            state: Arc::new(ConversationState::default()),
            index: TranscriptIndex::default(),
        })
    }
}

impl ConversationStore {
    /// Action kinds this store handles.
    pub const SUBSCRIBED_ACTIONS: &'static [&'static str] = &[
        DataChannelsAvailable::NAME,
        ReceivedTextChatMessage::NAME,
        SendTextChatMessage::NAME,
        UpdateRoomInfo::NAME,
        UpdateRoomContext::NAME,
        RemotePeerDisconnected::NAME,
        RemotePeerConnected::NAME,
        SetOwnDisplayName::NAME,
    ];

    /// Starts building a store.
    #[must_use]
    pub fn builder() -> ConversationStoreBuilder {
        ConversationStoreBuilder::default()
    }

    /// The conversation this store belongs to.
    #[must_use]
    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// The current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<ConversationState> {
        Arc::clone(&self.state)
    }

    /// Handles one action. Returns false if the store does not subscribe to
    /// its kind.
    #[instrument(skip(self, action), fields(conversation = %self.id, action = action.name()))]
    pub fn dispatch(&mut self, action: &Action) -> bool {
        match action {
            Action::DataChannelsAvailable(a) => self.data_channels_available(a),
            Action::ReceivedTextChatMessage(a) => self.received_text_chat_message(a),
            Action::SendTextChatMessage(a) => self.send_text_chat_message(a),
            Action::UpdateRoomInfo(a) => self.update_room_info(a),
            Action::UpdateRoomContext(a) => self.update_room_context(a),
            Action::RemotePeerDisconnected(a) => self.remote_peer_disconnected(a),
            Action::RemotePeerConnected(_) => self.remote_peer_connected(),
            Action::SetOwnDisplayName(a) => self.set_own_display_name(a),
            _ => {
                trace!("not subscribed");
                return false;
            }
        }
        true
    }

    /// Records data channel availability.
    pub fn data_channels_available(&mut self, action: &DataChannelsAvailable) {
        let was_enabled = self.state.chat_enabled;
        if was_enabled != action.available {
            self.publish(ConversationState {
                chat_enabled: action.available,
                ..(*self.state).clone()
            });
        }
        if action.available && !was_enabled {
            self.notify(HostNotification::ChatEnabled);
        }
    }

    /// Sends a message to the remote peer.
    ///
    /// Chat text is not appended locally because the peer echoes it back;
    /// every other content type is appended as sent before transmission.
    pub fn send_text_chat_message(&mut self, action: &SendTextChatMessage) {
        let content_type = ContentType::from(action.content_type.as_str());
        let display_name = if content_type == ContentType::Text {
            self.state
                .display_name
                .clone()
                .filter(|name| !name.is_empty())
        } else {
            None
        };

        if content_type != ContentType::Text || self.config.echo_sent_text {
            let mut message = Message::new(MessageKind::Sent, content_type.clone(), &action.message)
                .with_sent_at(timestamp_from_millis(action.sent_timestamp))
                .with_display_name(display_name.clone());
            message.extra_data = action.extra_data.clone();
            self.append_message(message);
        }

        let payload = ChatPayload {
            content_type,
            message: action.message.clone(),
            extra_data: action.extra_data.clone(),
            sent_timestamp: action.sent_timestamp,
            display_name,
        };
        debug!(content_type = %payload.content_type, "sending chat payload");
        self.data_driver.send_text_chat_message(&payload);
    }

    /// Appends a message that arrived from the remote peer.
    pub fn received_text_chat_message(&mut self, action: &ReceivedTextChatMessage) {
        let content_type = ContentType::from(action.content_type.as_str());
        if !content_type.is_receivable() {
            debug!(content_type = %content_type, "ignoring unsupported content type");
            return;
        }

        let own_text =
            content_type == ContentType::Text && self.is_own_name(action.display_name.as_deref());
        let kind = if own_text {
            MessageKind::Sent
        } else {
            MessageKind::Received
        };

        let mut message = Message::new(kind, content_type, &action.message)
            .with_sent_at(action.sent_timestamp.and_then(timestamp_from_millis))
            .with_received_at(timestamp_from_millis(action.received_timestamp))
            .with_display_name(action.display_name.clone());
        message.extra_data = action.extra_data.clone();
        self.append_message(message);
    }

    /// Records the room name and the room's shared-link context.
    pub fn update_room_info(&mut self, action: &UpdateRoomInfo) {
        if let Some(room_name) = action.room_name.as_deref().filter(|name| !name.is_empty()) {
            if self.state.room_name.as_deref() != Some(room_name) {
                self.publish(ConversationState {
                    room_name: Some(room_name.to_string()),
                    ..(*self.state).clone()
                });
            }
        }

        let Some(url) = action.room_context_urls.as_ref().and_then(|urls| urls.first()) else {
            return;
        };
        let message = Message::new(
            MessageKind::Special,
            ContentType::Context,
            url.description.clone().unwrap_or_default(),
        )
        .with_extra_data(serde_json::json!({
            "location": url.location,
            "thumbnail": url.thumbnail,
        }));
        self.append_message(message);
    }

    /// Shares a new page with the remote peer unless the last shared page is
    /// on the same host.
    pub fn update_room_context(&mut self, action: &UpdateRoomContext) {
        if let Some(position) = self.index.last_context_tile {
            let previous = self.state.messages[position].extra_str("newRoomURL");
            match (host_of(previous), host_of(action.new_room_url.as_deref())) {
                (Some(old), Some(new)) if old == new => {
                    debug!(host = %new, "context tile already shared for host");
                    return;
                }
                _ => {}
            }
        }

        let tile = SendTextChatMessage {
            content_type: ContentType::ContextTile.to_string(),
            message: action.new_room_description.clone().unwrap_or_default(),
            sent_timestamp: action.sent_timestamp.unwrap_or_else(now_millis),
            extra_data: Some(serde_json::json!({
                "roomToken": action.room_token,
                "newRoomThumbnail": action.new_room_thumbnail,
                "newRoomURL": action.new_room_url,
            })),
        };
        self.send_text_chat_message(&tile);
    }

    /// Notes that the remote peer left.
    pub fn remote_peer_disconnected(&mut self, action: &RemotePeerDisconnected) {
        let key = if action.peer_hungup {
            "peer_left_session"
        } else {
            "peer_unexpected_quit"
        };
        self.append_message(Message::peer_notification(key, "disconnected"));
    }

    /// Notes that the remote peer joined.
    pub fn remote_peer_connected(&mut self) {
        self.append_message(Message::peer_notification("peer_join_session", "connected"));
    }

    /// Records the local user's display name. Existing messages keep the
    /// name they were sent with.
    pub fn set_own_display_name(&mut self, action: &SetOwnDisplayName) {
        self.publish(ConversationState {
            display_name: Some(action.display_name.clone()),
            ..(*self.state).clone()
        });
    }

    fn is_own_name(&self, sender: Option<&str>) -> bool {
        if !self.config.detect_loopback_by_display_name {
            return false;
        }
        match (self.state.display_name.as_deref(), sender) {
            (Some(own), Some(sender)) => own == sender,
            _ => false,
        }
    }

    fn append_message(&mut self, message: Message) {
        let mut messages = self.state.messages.to_vec();
        let content_type = message.content_type.clone();

        let position = match (&content_type, self.index.context) {
            (ContentType::Context, Some(slot)) => {
                messages[slot] = message;
                slot
            }
            _ => {
                messages.push(message);
                messages.len() - 1
            }
        };
        match content_type {
            ContentType::Context => self.index.context = Some(position),
            ContentType::ContextTile => self.index.last_context_tile = Some(position),
            _ => {}
        }

        let chat_enabled = self.state.chat_enabled;
        self.publish(ConversationState {
            messages: messages.into(),
            ..(*self.state).clone()
        });
        trace!(position, content_type = %content_type, "message appended");

        if !matches!(content_type, ContentType::Context | ContentType::Notification) {
            self.notify(if chat_enabled {
                HostNotification::MessageAppendedEnabled
            } else {
                HostNotification::MessageAppendedDisabled
            });
        }
    }

    fn publish(&mut self, state: ConversationState) {
        self.state = Arc::new(state);
    }

    fn notify(&self, notification: HostNotification) {
        debug!(%notification, "host notification");
        if let Some(notifier) = &self.notifier {
            notifier.notify(notification);
        }
    }
}

impl ActionHandler for ConversationStore {
    fn subscribed_actions(&self) -> &[&'static str] {
        Self::SUBSCRIBED_ACTIONS
    }

    fn handle(&mut self, action: &Action) -> bool {
        self.dispatch(action)
    }
}

/// Hostname of a URL, if it parses and has one.
fn host_of(url: Option<&str>) -> Option<String> {
    Url::parse(url?).ok()?.host_str().map(str::to_owned)
}
