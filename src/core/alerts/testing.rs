// Recording sink doubles shared by the dispatcher and end-to-end tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::sinks::{
    ChatBroadcast, LogSink, OverlaySink, PopupSink, Recipient, RecipientDirectory, Sinks,
    WebhookSink,
};
use crate::core::error::SinkError;

#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<HashMap<&'static str, Vec<String>>>>,
}

impl Recorder {
    fn push(&self, sink: &'static str, value: String) {
        self.calls.borrow_mut().entry(sink).or_default().push(value);
    }

    pub fn calls(&self, sink: &str) -> Vec<String> {
        self.calls.borrow().get(sink).cloned().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().map(Vec::len).sum()
    }

    /// Calls to user-facing sinks only.
    pub fn alert_calls(&self) -> usize {
        ["chat", "popup", "overlay", "webhook_text", "webhook_panel"]
            .iter()
            .map(|sink| self.calls(sink).len())
            .sum()
    }

    /// Console and file writes.
    pub fn log_calls(&self) -> usize {
        self.calls("console").len() + self.calls("file").len()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

struct Chat(Recorder, bool);

impl ChatBroadcast for Chat {
    fn broadcast(&self, text: &str, _icon_id: u64) -> Result<(), SinkError> {
        self.0.push("chat", text.to_string());
        if self.1 {
            Err(SinkError::Unavailable)
        } else {
            Ok(())
        }
    }
}

struct Popup(Recorder);

impl PopupSink for Popup {
    fn show_popup(&self, text: &str) -> Result<(), SinkError> {
        self.0.push("popup", text.to_string());
        Ok(())
    }
}

struct Overlay(Recorder);

impl OverlaySink for Overlay {
    fn notify(&self, recipient: &Recipient, _style: i32, text: &str) -> Result<(), SinkError> {
        self.0.push("overlay", format!("{}:{}", recipient.id, text));
        Ok(())
    }
}

struct Directory;

impl RecipientDirectory for Directory {
    fn connected(&self) -> Vec<Recipient> {
        ["alice", "bob"]
            .iter()
            .map(|id| Recipient {
                id: id.to_string(),
                name: id.to_string(),
            })
            .collect()
    }

    fn has_capability(&self, recipient_id: &str, capability: &str) -> bool {
        recipient_id == "alice" && capability == "uinotify.see"
    }
}

struct Webhook(Recorder);

impl WebhookSink for Webhook {
    fn send_text(&self, _url: &str, text: &str) -> Result<(), SinkError> {
        self.0.push("webhook_text", text.to_string());
        Ok(())
    }

    fn send_panel(&self, _url: &str, _title: &str, color: u32, body_json: &str) -> Result<(), SinkError> {
        self.0.push("webhook_panel", format!("{}|{}", color, body_json));
        Ok(())
    }
}

struct Log(Recorder);

impl LogSink for Log {
    fn write_console(&self, text: &str) -> Result<(), SinkError> {
        self.0.push("console", text.to_string());
        Ok(())
    }

    fn append_file(&self, line: &str) -> Result<(), SinkError> {
        self.0.push("file", line.to_string());
        Ok(())
    }
}

pub struct RecordingSinks;

impl RecordingSinks {
    pub fn build() -> (Sinks, Recorder) {
        Self::assemble(false)
    }

    pub fn build_with_failing_chat() -> (Sinks, Recorder) {
        Self::assemble(true)
    }

    fn assemble(chat_fails: bool) -> (Sinks, Recorder) {
        let recorder = Recorder::default();
        let sinks = Sinks::default()
            .with_chat(Chat(recorder.clone(), chat_fails))
            .with_popup(Popup(recorder.clone()))
            .with_overlay(Overlay(recorder.clone()), Directory)
            .with_webhook(Webhook(recorder.clone()))
            .with_log(Log(recorder.clone()));
        (sinks, recorder)
    }
}
