//! Line-by-line action replay.

use crate::error::ReplayError;
use roomchat_actions::action::SetOwnDisplayName;
use roomchat_actions::{ActionCatalog, ActionHandler};
use roomchat_conversation::{ConversationState, ConversationStore};
use roomchat_core::Result;
use serde::Serialize;
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line.
    Blank,
    /// Not JSON, or not a valid action.
    Invalid,
    /// A valid action the store does not subscribe to.
    Ignored,
    /// Dispatched to the store.
    Handled,
}

/// Line counts for a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub handled: usize,
    pub ignored: usize,
    pub invalid: usize,
}

impl ReplaySummary {
    fn record(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Blank => {}
            LineOutcome::Invalid => self.invalid += 1,
            LineOutcome::Ignored => self.ignored += 1,
            LineOutcome::Handled => self.handled += 1,
        }
    }
}

/// Decodes action lines and dispatches them to a store.
#[derive(Debug)]
pub struct Replay {
    catalog: ActionCatalog,
    store: ConversationStore,
}

impl Replay {
    /// Creates a replay over the standard action catalog.
    #[must_use]
    pub fn new(store: ConversationStore) -> Self {
        Self {
            catalog: ActionCatalog::standard(),
            store,
        }
    }

    /// Sets the local display name before any input is replayed.
    pub fn set_display_name(&mut self, display_name: &str) {
        self.store.dispatch(
            &SetOwnDisplayName {
                display_name: display_name.to_string(),
            }
            .into(),
        );
    }

    /// The store's current snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<ConversationState> {
        self.store.state()
    }

    /// Decodes and dispatches one line.
    pub fn replay_line(&mut self, line_number: usize, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() {
            return LineOutcome::Blank;
        }
        let record: serde_json::Value = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_number, error = %e, "skipping line that is not JSON");
                return LineOutcome::Invalid;
            }
        };
        let action = match self.catalog.decode(&record) {
            Ok(action) => action,
            Err(e) => {
                warn!(line = line_number, error = %e, "skipping invalid action");
                return LineOutcome::Invalid;
            }
        };
        if self.store.handle(&action) {
            debug!(line = line_number, action = action.name(), "dispatched");
            LineOutcome::Handled
        } else {
            debug!(line = line_number, action = action.name(), "not handled by conversation store");
            LineOutcome::Ignored
        }
    }

    /// Replays every line of `input` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::ReadInput`] if reading fails. Invalid lines are
    /// skipped, not reported as errors.
    pub fn replay(&mut self, input: impl BufRead) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::default();
        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| ReplayError::ReadInput {
                line: line_number,
                details: e.to_string(),
            })?;
            summary.record(self.replay_line(line_number, &line));
        }
        info!(
            handled = summary.handled,
            ignored = summary.ignored,
            invalid = summary.invalid,
            "replay finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{LoggingNotifier, PrintingDriver};
    use roomchat_conversation::{ContentType, MessageKind};
    use std::io::{BufReader, Write};

    fn replay() -> Replay {
        let store = ConversationStore::builder()
            .data_driver(Arc::new(PrintingDriver::new(std::io::sink())))
            .notifier(Arc::new(LoggingNotifier))
            .build()
            .expect("store should build");
        Replay::new(store)
    }

    const SESSION: &str = r#"
{"name":"dataChannelsAvailable","available":true}
{"name":"remotePeerConnected"}
not json at all
{"name":"receivedTextChatMessage","contentType":"chat-text","message":"hello","receivedTimestamp":1000}
{"name":"receivedTextChatMessage","contentType":"chat-text","receivedTimestamp":1000}
{"name":"leaveRoom"}
{"name":"noSuchAction"}
"#;

    #[test]
    fn replay_skips_invalid_lines_and_dispatches_the_rest() {
        let mut replay = replay();
        let summary = replay.replay(SESSION.as_bytes()).expect("replay");

        assert_eq!(
            summary,
            ReplaySummary {
                handled: 3,
                ignored: 1,
                invalid: 3,
            }
        );
        let state = replay.state();
        assert!(state.chat_enabled);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].content_type, ContentType::Text);
        assert_eq!(state.messages[1].message, "hello");
    }

    #[test]
    fn display_name_marks_own_text_as_sent() {
        let mut replay = replay();
        replay.set_display_name("Ada");
        let outcome = replay.replay_line(
            1,
            r#"{"name":"receivedTextChatMessage","contentType":"chat-text","message":"me","receivedTimestamp":1,"displayName":"Ada"}"#,
        );
        assert_eq!(outcome, LineOutcome::Handled);
        assert_eq!(replay.state().messages[0].kind, MessageKind::Sent);
    }

    #[test]
    fn blank_lines_are_not_counted() {
        let mut replay = replay();
        assert_eq!(replay.replay_line(1, "   "), LineOutcome::Blank);
        let summary = replay.replay("\n\n".as_bytes()).expect("replay");
        assert_eq!(summary, ReplaySummary::default());
    }

    #[test]
    fn replay_reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, r#"{{"name":"setOwnDisplayName","displayName":"Ada"}}"#).expect("write");
        writeln!(file, r#"{{"name":"remotePeerDisconnected","peerHungup":true}}"#).expect("write");
        file.flush().expect("flush");

        let input = std::fs::File::open(file.path()).expect("open");
        let mut replay = replay();
        let summary = replay.replay(BufReader::new(input)).expect("replay");

        assert_eq!(summary.handled, 2);
        let state = replay.state();
        assert_eq!(state.display_name.as_deref(), Some("Ada"));
        assert_eq!(state.messages[0].message, "peer_left_session");
    }
}
