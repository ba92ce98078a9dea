//! Replay configuration.
//!
//! Loaded via the `config` crate from `ROOMCHAT__*` environment variables,
//! e.g. `ROOMCHAT__INPUT=actions.jsonl` or
//! `ROOMCHAT__CONVERSATION__ECHO_SENT_TEXT=true`.

use roomchat_conversation::ConversationConfig;
use serde::Deserialize;
use std::path::PathBuf;

/// Replay configuration composed from library configs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplayConfig {
    /// File to read actions from. Standard input when unset.
    #[serde(default)]
    pub input: Option<PathBuf>,

    /// Display name to set before the first action.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Conversation store configuration.
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl ReplayConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed into its field.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("ROOMCHAT")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ReplayConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ReplayConfig::from_environment(ReplayConfig::environment().source(Some(vars)))
            .expect("config should load")
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]);
        assert!(config.input.is_none());
        assert!(config.display_name.is_none());
        assert_eq!(config.conversation, ConversationConfig::default());
    }

    #[test]
    fn nested_conversation_settings_are_read() {
        let config = load(&[
            ("ROOMCHAT__INPUT", "actions.jsonl"),
            ("ROOMCHAT__DISPLAY_NAME", "Ada"),
            ("ROOMCHAT__CONVERSATION__ECHO_SENT_TEXT", "true"),
        ]);
        assert_eq!(config.input, Some(PathBuf::from("actions.jsonl")));
        assert_eq!(config.display_name.as_deref(), Some("Ada"));
        assert!(config.conversation.echo_sent_text);
        assert!(config.conversation.detect_loopback_by_display_name);
    }
}
