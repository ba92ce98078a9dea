//! Console-facing driver and notifier.

use crate::error::ReplayError;
use roomchat_conversation::{
    ChatPayload, ConversationState, DataDriver, HostNotification, HostNotifier,
};
use roomchat_core::Result;
use std::io::Write;
use std::sync::Mutex;
use tracing::{info, warn};

/// Prefix marking an outgoing payload in the output.
pub const SENT_PREFIX: &str = ">> ";

/// A data driver that prints each payload as one JSON line.
#[derive(Debug)]
pub struct PrintingDriver<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> PrintingDriver<W> {
    /// Creates a driver writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consumes the driver, returning the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> DataDriver for PrintingDriver<W> {
    fn send_text_chat_message(&self, payload: &ChatPayload) {
        let line = match serde_json::to_string(payload) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize payload");
                return;
            }
        };
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{SENT_PREFIX}{line}") {
            warn!(error = %e, "failed to write payload");
        }
    }
}

/// A notifier that logs each notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl HostNotifier for LoggingNotifier {
    fn notify(&self, notification: HostNotification) {
        info!(%notification, "host notification");
    }
}

/// Writes a state snapshot as pretty JSON.
///
/// # Errors
///
/// Returns [`ReplayError::WriteOutput`] if serialization or writing fails.
pub fn write_state(mut out: impl Write, state: &ConversationState) -> Result<(), ReplayError> {
    let json = serde_json::to_string_pretty(state).map_err(|e| ReplayError::WriteOutput {
        details: e.to_string(),
    })?;
    writeln!(out, "{json}").map_err(|e| ReplayError::WriteOutput {
        details: e.to_string(),
    })?;
    Ok(())
}
