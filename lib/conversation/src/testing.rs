//! Recording doubles for the store's outbound seams.

use crate::driver::{ChatPayload, DataDriver, HostNotification, HostNotifier};
use std::sync::Mutex;

/// Keeps every payload it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    sent: Mutex<Vec<ChatPayload>>,
}

impl RecordingDriver {
    pub fn sent(&self) -> Vec<ChatPayload> {
        self.sent.lock().expect("driver lock poisoned").clone()
    }
}

impl DataDriver for RecordingDriver {
    fn send_text_chat_message(&self, payload: &ChatPayload) {
        self.sent
            .lock()
            .expect("driver lock poisoned")
            .push(payload.clone());
    }
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<HostNotification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<HostNotification> {
        self.notifications
            .lock()
            .expect("notifier lock poisoned")
            .clone()
    }
}

impl HostNotifier for RecordingNotifier {
    fn notify(&self, notification: HostNotification) {
        self.notifications
            .lock()
            .expect("notifier lock poisoned")
            .push(notification);
    }
}
