//! Conversation store configuration.
//!
//! Loaded by the host alongside its own settings; every field has a
//! default so an empty source yields the standard behavior.

use serde::Deserialize;

/// Tunables for a [`ConversationStore`](crate::ConversationStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationConfig {
    /// Append outgoing chat text to the local transcript immediately.
    ///
    /// Off by default: the data channel echoes our own text back, and that
    /// copy is the one shown.
    #[serde(default)]
    pub echo_sent_text: bool,

    /// Attribute received chat text to ourselves when its sender name
    /// matches our own display name.
    #[serde(default = "default_detect_loopback")]
    pub detect_loopback_by_display_name: bool,
}

fn default_detect_loopback() -> bool {
    true
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            echo_sent_text: false,
            detect_loopback_by_display_name: default_detect_loopback(),
        }
    }
}
