use serde::Serialize;
use tauri::Emitter;

pub const STATUS_EVENT: &str = "status-message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Warning,
    Neutral,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

pub trait StatusSink: Send + Sync {
    fn publish(&self, message: &StatusMessage);
}

pub struct TauriStatusSink {
    app: tauri::AppHandle,
}

impl TauriStatusSink {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl StatusSink for TauriStatusSink {
    fn publish(&self, message: &StatusMessage) {
        if let Err(e) = self.app.emit(STATUS_EVENT, message) {
            log::warn!("failed to emit status message: {e}");
        }
    }
}

// Single slot: a new message replaces the previous one, whatever its tone.
#[derive(Default)]
pub struct StatusChannel {
    last: Option<StatusMessage>,
}

impl StatusChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, sink: &dyn StatusSink, text: impl Into<String>, tone: Tone) {
        let message = StatusMessage {
            text: text.into(),
            tone,
        };
        sink.publish(&message);
        self.last = Some(message);
    }

    pub fn last(&self) -> Option<&StatusMessage> {
        self.last.as_ref()
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemorySink {
        pub published: Mutex<Vec<StatusMessage>>,
    }

    impl StatusSink for MemorySink {
        fn publish(&self, message: &StatusMessage) {
            self.published.lock().unwrap().push(message.clone());
        }
    }
}
