//! The closed set of typed actions.
//!
//! Actions are events triggered by the user (clicking a button) or by an
//! asynchronous notification (a peer joined, a message arrived). Each kind
//! is a plain struct; [`Action`] is the tagged union dispatched to stores.
//!
//! On the wire an action is a JSON object whose `name` field selects the
//! kind. Inside the process, kinds are constructed directly and need no
//! validation; [`Action::from_values`] is the shim for values arriving from
//! outside.

use crate::error::ValidationError;
use crate::schema::{validate, ActionSchema, FieldType as T};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field that carries an action's kind in its serialized form.
pub const NAME_FIELD: &str = "name";

/// Generates one struct per action kind, the [`Action`] union over them,
/// and the schema each kind validates against.
macro_rules! define_actions {
    (
        $(
            $(#[$meta:meta])*
            $kind:ident => $name:literal {
                $( $field:ident : $ty:ty = $key:literal as $ftype:expr ),* $(,)?
                $( ; optional { $( $ofield:ident : $oty:ty = $okey:literal as $oftype:expr ),* $(,)? } )?
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
            pub struct $kind {
                $(
                    #[serde(rename = $key)]
                    pub $field: $ty,
                )*
                $($(
                    #[serde(rename = $okey, default, skip_serializing_if = "Option::is_none")]
                    pub $ofield: Option<$oty>,
                )*)?
            }

            impl $kind {
                /// Canonical action name.
                pub const NAME: &'static str = $name;

                /// The schema raw values for this kind are validated against.
                #[must_use]
                pub fn schema() -> ActionSchema {
                    ActionSchema::new()
                        $( .required($key, $ftype) )*
                        $($( .optional($okey, $oftype) )*)?
                }
            }

            impl From<$kind> for Action {
                fn from(action: $kind) -> Self {
                    Self::$kind(action)
                }
            }
        )*

        /// A validated, named event record.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "name")]
        pub enum Action {
            $(
                $(#[$meta])*
                #[serde(rename = $name)]
                $kind($kind),
            )*
        }

        impl Action {
            /// Names of every action kind, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$($name),*];

            /// The canonical name of this action.
            #[must_use]
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$kind(_) => $name, )*
                }
            }

            /// Looks up the schema for the action called `name`.
            #[must_use]
            pub fn schema_for(name: &str) -> Option<ActionSchema> {
                match name {
                    $( $name => Some($kind::schema()), )*
                    _ => None,
                }
            }
        }
    };
}

/// One shared link attached to a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomContextUrl {
    /// Page title or user-supplied description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The page address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Thumbnail image, usually a data URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

define_actions! {
    /// Get the window data for the provided window id.
    GetWindowData => "getWindowData" {
        window_id: String = "windowId" as T::String,
    }

    /// Extract the token information and type for the standalone window.
    ExtractTokenInfo => "extractTokenInfo" {
        window_path: String = "windowPath" as T::String,
        window_hash: String = "windowHash" as T::String,
    }

    /// Pass round the window data so stores can record it.
    SetupWindowData => "setupWindowData" {
        room_token: String = "roomToken" as T::String,
    }

    /// Fetch the server data for a room or call token.
    FetchServerData => "fetchServerData" {
        token: String = "token" as T::String,
        window_type: String = "windowType" as T::String;
        optional {
            crypto_key: String = "cryptoKey" as T::String,
        }
    }

    /// The window is being unloaded.
    WindowUnload => "windowUnload" {}

    /// The remote peer was disconnected. `peer_hungup` is true when the peer
    /// left on purpose.
    RemotePeerDisconnected => "remotePeerDisconnected" {
        peer_hungup: bool = "peerHungup" as T::Boolean,
    }

    /// A connection attempt failed.
    ConnectionFailure => "connectionFailure" {
        reason: String = "reason" as T::String,
    }

    /// The media session is connected to the servers.
    ConnectedToSdkServers => "connectedToSdkServers" {}

    /// A remote peer joined the room.
    RemotePeerConnected => "remotePeerConnected" {}

    /// The session's data channel availability changed.
    DataChannelsAvailable => "dataChannelsAvailable" {
        available: bool = "available" as T::Boolean,
    }

    /// Send a message to the other peer.
    SendTextChatMessage => "sendTextChatMessage" {
        content_type: String = "contentType" as T::String,
        message: String = "message" as T::String,
        sent_timestamp: f64 = "sentTimestamp" as T::Number;
        optional {
            extra_data: Value = "extraData" as T::Object,
        }
    }

    /// A message arrived from the other peer.
    ReceivedTextChatMessage => "receivedTextChatMessage" {
        content_type: String = "contentType" as T::String,
        message: String = "message" as T::String,
        received_timestamp: f64 = "receivedTimestamp" as T::Number;
        optional {
            display_name: String = "displayName" as T::String,
            sent_timestamp: f64 = "sentTimestamp" as T::Number,
            extra_data: Value = "extraData" as T::Object,
        }
    }

    /// The name identifying the local user.
    SetOwnDisplayName => "setOwnDisplayName" {
        display_name: String = "displayName" as T::String,
    }

    /// Participant data was received.
    UpdatedParticipant => "updatedParticipant" {
        participant_name: String = "participantName" as T::String,
        user_id: String = "userId" as T::String,
    }

    /// Presence data was received.
    UpdatedPresence => "updatedPresence" {
        is_here: bool = "isHere" as T::Boolean,
        pinged_ago: f64 = "pingedAgo" as T::Number,
        user_id: String = "userId" as T::String,
    }

    /// Add a page to the current room.
    AddPage => "addPage" {
        title: String = "title" as T::String,
        thumbnail_img: String = "thumbnail_img" as T::String,
        url: String = "url" as T::String,
    }

    /// A page was added by the other peer.
    AddedPage => "addedPage" {
        page_id: String = "pageId" as T::String,
        added_by: String = "added_by" as T::String,
        added_time: f64 = "added_time" as T::Number,
        metadata: Value = "metadata" as T::Object,
    }

    /// Delete a page from the current room.
    DeletePage => "deletePage" {
        page_id: String = "pageId" as T::String,
    }

    /// A page was removed.
    DeletedPage => "deletedPage" {
        page_id: String = "pageId" as T::String,
        added_by: String = "added_by" as T::String,
        added_time: f64 = "added_time" as T::Number,
        metadata: Value = "metadata" as T::Object,
        deleted: Value = "deleted" as T::Object,
    }

    /// Update a page with newly obtained metadata.
    UpdatePage => "updatePage" {
        thumbnail_img: String = "thumbnail_img" as T::String,
        title: String = "title" as T::String,
        page_id: String = "pageId" as T::String,
    }

    /// Send cursor data to the other peer.
    SendCursorData => "sendCursorData" {
        r#type: String = "type" as T::String;
        optional {
            ratio_x: f64 = "ratioX" as T::Number,
            ratio_y: f64 = "ratioY" as T::Number,
        }
    }

    /// Cursor data arrived from the other peer.
    ReceivedCursorData => "receivedCursorData" {
        r#type: String = "type" as T::String;
        optional {
            ratio_x: f64 = "ratioX" as T::Number,
            ratio_y: f64 = "ratioY" as T::Number,
        }
    }

    /// The views describe the elements the media session needs.
    SetupStreamElements => "setupStreamElements" {
        publisher_config: Value = "publisherConfig" as T::Object,
    }

    /// A waiting tile was shown.
    TileShown => "tileShown" {}

    /// Local media permission was granted.
    GotMediaPermission => "gotMediaPermission" {}

    /// Media is up for the call.
    MediaConnected => "mediaConnected" {}

    /// A stream's dimensions changed, or it connected for the first time.
    VideoDimensionsChanged => "videoDimensionsChanged" {
        is_local: bool = "isLocal" as T::Boolean,
        video_type: String = "videoType" as T::String,
        dimensions: Value = "dimensions" as T::Object,
    }

    /// The screen stream's video flag changed.
    VideoScreenStreamChanged => "videoScreenStreamChanged" {
        has_video: bool = "hasVideo" as T::Boolean,
    }

    /// A local or remote media stream was created.
    MediaStreamCreated => "mediaStreamCreated" {
        has_audio: bool = "hasAudio" as T::Boolean,
        has_video: bool = "hasVideo" as T::Boolean,
        is_local: bool = "isLocal" as T::Boolean,
        src_media_element: Value = "srcMediaElement" as T::Object,
    }

    /// A local or remote media stream was destroyed.
    MediaStreamDestroyed => "mediaStreamDestroyed" {
        is_local: bool = "isLocal" as T::Boolean,
    }

    /// The remote stream enabled or disabled its video.
    RemoteVideoStatus => "remoteVideoStatus" {
        video_enabled: bool = "videoEnabled" as T::Boolean,
    }

    /// Mute or unmute part of a stream (`type` is "audio" or "video").
    SetMute => "setMute" {
        r#type: String = "type" as T::String,
        enabled: bool = "enabled" as T::Boolean,
    }

    /// Start sharing a browser tab.
    StartBrowserShare => "startBrowserShare" {}

    /// End a screen share.
    EndScreenShare => "endScreenShare" {}

    /// Pause or resume a browser share.
    ToggleBrowserSharing => "toggleBrowserSharing" {
        enabled: bool = "enabled" as T::Boolean,
    }

    /// Screen sharing became active or inactive.
    ScreenSharingState => "screenSharingState" {
        state: String = "state" as T::String,
    }

    /// A shared screen started or stopped arriving.
    ReceivingScreenShare => "receivingScreenShare" {
        receiving: bool = "receiving" as T::Boolean;
        optional {
            src_media_element: Value = "srcMediaElement" as T::Object,
        }
    }

    /// Create a new room.
    CreateRoom => "createRoom" {
        ;
        optional {
            urls: Value = "urls" as T::Object,
        }
    }

    /// A room was created.
    CreatedRoom => "createdRoom" {
        decrypted_context: Value = "decryptedContext" as T::Object,
        room_token: String = "roomToken" as T::String,
        room_url: String = "roomUrl" as T::String,
    }

    /// Room creation failed.
    CreateRoomError => "createRoomError" {
        error: Value = "error" as T::Object,
    }

    /// Delete a room.
    DeleteRoom => "deleteRoom" {
        room_token: String = "roomToken" as T::String,
    }

    /// Room deletion failed.
    DeleteRoomError => "deleteRoomError" {
        error: Value = "error" as T::Object,
    }

    /// Retrieve the room list.
    GetAllRooms => "getAllRooms" {}

    /// Fetching the room list failed.
    GetAllRoomsError => "getAllRoomsError" {
        error: Value = "error" as T::OneOf(vec![T::Error, T::Object]),
    }

    /// Replace the room list.
    UpdateRoomList => "updateRoomList" {
        room_list: Vec<Value> = "roomList" as T::Array,
    }

    /// Open a room.
    OpenRoom => "openRoom" {
        room_token: String = "roomToken" as T::String,
    }

    /// The shared page of a room changed.
    UpdateRoomContext => "updateRoomContext" {
        room_token: String = "roomToken" as T::String;
        optional {
            new_room_name: String = "newRoomName" as T::String,
            new_room_description: String = "newRoomDescription" as T::String,
            new_room_thumbnail: String = "newRoomThumbnail" as T::String,
            new_room_url: String = "newRoomURL" as T::String,
            sent_timestamp: f64 = "sentTimestamp" as T::Number,
        }
    }

    /// Updating the room context failed.
    UpdateRoomContextError => "updateRoomContextError" {
        error: Value = "error" as T::OneOf(vec![T::Error, T::Object]),
    }

    /// Updating the room context finished.
    UpdateRoomContextDone => "updateRoomContextDone" {}

    /// Copy a room url to the clipboard. `from` is "panel" or "conversation".
    CopyRoomUrl => "copyRoomUrl" {
        from: String = "from" as T::String,
        room_url: String = "roomUrl" as T::String,
    }

    /// Email a room url.
    EmailRoomUrl => "emailRoomUrl" {
        from: String = "from" as T::String,
        room_url: String = "roomUrl" as T::String;
        optional {
            room_description: String = "roomDescription" as T::String,
        }
    }

    /// Share a room url on Facebook.
    FacebookShareRoomUrl => "facebookShareRoomUrl" {
        from: String = "from" as T::String,
        room_url: String = "roomUrl" as T::String;
        optional {
            room_origin: String = "roomOrigin" as T::String,
        }
    }

    /// Joining or using the room failed.
    RoomFailure => "roomFailure" {
        error: Value = "error" as T::Object,
        failed_join_request: bool = "failedJoinRequest" as T::Boolean,
    }

    /// Room information was received.
    UpdateRoomInfo => "updateRoomInfo" {
        room_url: String = "roomUrl" as T::String;
        optional {
            participants: Vec<Value> = "participants" as T::Array,
            room_context_urls: Vec<RoomContextUrl> = "roomContextUrls" as T::Array,
            room_info_failure: String = "roomInfoFailure" as T::String,
            room_name: String = "roomName" as T::String,
            room_state: String = "roomState" as T::String,
        }
    }

    /// Whether the user agent handles the room itself.
    UserAgentHandlesRoom => "userAgentHandlesRoom" {
        handles_room: bool = "handlesRoom" as T::Boolean,
    }

    /// The user agent's room state changed.
    UpdateUserAgentRoomState => "updateUserAgentRoomState" {
        status: String = "status" as T::String,
    }

    /// Open the room in the user agent.
    OpenUserAgentRoom => "openUserAgentRoom" {}

    /// The user chose to start the WebRTC connection.
    InitiateWebRTC => "initiateWebRTC" {}

    /// Records which kind of join happened.
    MetricsLogJoinRoom => "metricsLogJoinRoom" {
        user_agent_handled_room: bool = "userAgentHandledRoom" as T::Boolean;
        optional {
            own_room: bool = "ownRoom" as T::Boolean,
        }
    }

    /// Retry joining after a room failure.
    RetryAfterRoomFailure => "retryAfterRoomFailure" {}

    /// The user joined the room on the server.
    SetupWebRTCTokens => "setupWebRTCTokens" {
        api_key: String = "apiKey" as T::String,
        session_token: String = "sessionToken" as T::String,
        session_id: String = "sessionId" as T::String,
    }

    /// The user wants to leave the conversation.
    LeaveConversation => "leaveConversation" {}

    /// The user wants to leave the room.
    LeaveRoom => "leaveRoom" {}

    /// Show the feedback form.
    ShowFeedbackForm => "showFeedbackForm" {}

    /// A link was clicked. `link_info` describes where, not what.
    RecordClick => "recordClick" {
        link_info: String = "linkInfo" as T::String,
    }

    /// Current session, publisher and connection status.
    ConnectionStatus => "connectionStatus" {
        event: String = "event" as T::String,
        state: String = "state" as T::String,
        connections: f64 = "connections" as T::Number,
        send_streams: f64 = "sendStreams" as T::Number,
        recv_streams: f64 = "recvStreams" as T::Number,
    }

    /// Show the snackbar.
    ShowSnackbar => "showSnackbar" {
        label: String = "label" as T::String,
    }
}

impl Action {
    /// Builds a typed action from untrusted values.
    ///
    /// This is the boundary shim for actions decoded from the network or a
    /// log: values are validated against the kind's schema, unknown fields
    /// are dropped, and the canonical name is stamped last.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] report when the name is unknown, a
    /// required field is missing, or a field has the wrong shape.
    pub fn from_values(
        name: &str,
        values: &Map<String, Value>,
    ) -> roomchat_core::Result<Self, ValidationError> {
        let schema = Self::schema_for(name).ok_or_else(|| ValidationError::UnknownAction {
            name: name.to_string(),
        })?;
        let sanitized = validate(name, &schema, values)?;
        Ok(Self::from_sanitized(name, sanitized)?)
    }

    /// Converts already-validated values into the typed union.
    pub(crate) fn from_sanitized(
        name: &str,
        mut values: Map<String, Value>,
    ) -> Result<Self, ValidationError> {
        values.insert(NAME_FIELD.to_string(), Value::String(name.to_string()));
        serde_json::from_value(Value::Object(values)).map_err(|e| {
            if Self::schema_for(name).is_none() {
                ValidationError::UnknownAction {
                    name: name.to_string(),
                }
            } else {
                ValidationError::Malformed {
                    action: name.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    /// Returns true if this is one of the listed kinds.
    #[must_use]
    pub fn is_one_of(&self, names: &[&str]) -> bool {
        names.contains(&self.name())
    }
}
